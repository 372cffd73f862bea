mod common;

use std::time::Duration;

use chrono::Utc;
use interview_backend::database::schema::{ensure_interview_schema, SchemaRequirements};
use interview_backend::error::Error;
use interview_backend::models::interview::InterviewStatus;
use interview_backend::models::transcript::Evaluation;
use serde_json::json;

fn evaluation(pairs: &[(&str, serde_json::Value)]) -> Evaluation {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn create_schedules_an_empty_interview() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);

    let interview = service.create(1, 1).await.unwrap();
    assert!(interview.id > 0);
    assert_eq!(interview.candidate_id, 1);
    assert_eq!(interview.jd_id, 1);
    assert_eq!(interview.status, InterviewStatus::Scheduled);
    assert!(interview.transcript.is_empty());
    assert!(interview.start_time.is_none());
    assert!(interview.end_time.is_none());

    let other = service.create(1, 1).await.unwrap();
    assert_ne!(other.id, interview.id);

    assert_eq!(service.get(interview.id).await.unwrap(), interview);
}

#[tokio::test]
async fn create_rejects_non_positive_ids() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);

    assert!(matches!(
        service.create(0, 1).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        service.create(1, -5).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn full_interview_lifecycle() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);

    let created = service.create(1, 1).await.unwrap();
    let id = created.id;

    assert!(service.start(id).await.unwrap());
    let started = service.get(id).await.unwrap();
    assert_eq!(started.status, InterviewStatus::InProgress);
    let start_time = started.start_time.expect("start_time set");
    assert!(start_time <= Utc::now());

    assert!(service
        .append_qa(
            id,
            "Q1",
            "A1",
            Some(evaluation(&[("confidence", json!("high"))]))
        )
        .await
        .unwrap());

    assert!(service.end(id).await.unwrap());
    let ended = service.get(id).await.unwrap();
    assert_eq!(ended.status, InterviewStatus::Completed);
    assert_eq!(ended.start_time, Some(start_time));
    let end_time = ended.end_time.expect("end_time set");
    assert!(end_time >= start_time);

    let transcript = service.get_transcript(id).await.unwrap();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].question, "Q1");
    assert_eq!(transcript[0].answer, "A1");
    assert_eq!(transcript[0].evaluation["confidence"], json!("high"));
    assert_eq!(ended.transcript, transcript);
}

#[tokio::test]
async fn start_twice_restamps_start_time() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let id = service.create(2, 3).await.unwrap().id;

    assert!(service.start(id).await.unwrap());
    let first = service.get(id).await.unwrap().start_time.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(service.start(id).await.unwrap());
    let again = service.get(id).await.unwrap();
    assert_eq!(again.status, InterviewStatus::InProgress);
    assert!(again.start_time.unwrap() > first);
}

#[tokio::test]
async fn appends_keep_order_and_prior_entries() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let id = service.create(4, 4).await.unwrap().id;
    service.start(id).await.unwrap();

    let mut previous = Vec::new();
    for n in 0..4 {
        let eval = (n % 2 == 0).then(|| evaluation(&[("score", json!(n))]));
        assert!(service
            .append_qa(id, &format!("Q{}", n), &format!("A{}", n), eval)
            .await
            .unwrap());

        let current = service.get_transcript(id).await.unwrap();
        assert_eq!(current.len(), previous.len() + 1);
        assert_eq!(&current[..previous.len()], &previous[..]);
        previous = current;
    }

    let questions: Vec<&str> = previous.iter().map(|e| e.question.as_str()).collect();
    assert_eq!(questions, ["Q0", "Q1", "Q2", "Q3"]);
    assert!(previous[1].evaluation.is_empty());
    assert_eq!(previous[2].evaluation["score"], json!(2));
    assert!(previous.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn empty_question_or_answer_is_rejected_before_writing() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let id = service.create(5, 5).await.unwrap().id;

    assert!(matches!(
        service.append_qa(id, "", "A", None).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        service.append_qa(id, "Q", "", None).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        service.append_qa(id, "   ", "\n", None).await,
        Err(Error::Validation(_))
    ));
    assert!(service.get_transcript(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_transcript_fails_without_touching_the_row() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let id = service.create(10, 10).await.unwrap().id;
    service.start(id).await.unwrap();

    sqlx::query("UPDATE interviews SET transcript = $1 WHERE id = $2")
        .bind("{bad")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(matches!(
        service.append_qa(id, "Q", "A", None).await,
        Err(Error::Json(_))
    ));

    let stored: Option<String> =
        sqlx::query_scalar("SELECT transcript FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored.as_deref(), Some("{bad"));

    assert!(matches!(service.get(id).await, Err(Error::Json(_))));
    assert!(matches!(service.get_transcript(id).await, Err(Error::Json(_))));
}

#[tokio::test]
async fn unknown_interview_is_reported_not_raised() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let missing = i32::MAX;

    assert!(matches!(service.get(missing).await, Err(Error::NotFound(_))));
    assert!(!service.start(missing).await.unwrap());
    assert!(!service.end(missing).await.unwrap());
    assert!(!service.cancel(missing).await.unwrap());
    assert!(!service.append_qa(missing, "Q", "A", None).await.unwrap());
    assert!(service.get_transcript(missing).await.unwrap().is_empty());
}

#[tokio::test]
async fn guarded_transitions() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);

    let scheduled = service.create(6, 6).await.unwrap().id;
    assert!(matches!(
        service.end(scheduled).await,
        Err(Error::InvalidTransition {
            from: InterviewStatus::Scheduled,
            to: InterviewStatus::Completed,
            ..
        })
    ));
    let unchanged = service.get(scheduled).await.unwrap();
    assert_eq!(unchanged.status, InterviewStatus::Scheduled);
    assert!(unchanged.end_time.is_none());

    assert!(service.cancel(scheduled).await.unwrap());
    assert!(service.cancel(scheduled).await.unwrap());
    let cancelled = service.get(scheduled).await.unwrap();
    assert_eq!(cancelled.status, InterviewStatus::Cancelled);
    assert!(cancelled.start_time.is_none());
    assert!(cancelled.end_time.is_none());
    assert!(matches!(
        service.start(scheduled).await,
        Err(Error::InvalidTransition { .. })
    ));

    let running = service.create(6, 7).await.unwrap().id;
    service.start(running).await.unwrap();
    assert!(service.cancel(running).await.unwrap());
    let cancelled = service.get(running).await.unwrap();
    assert_eq!(cancelled.status, InterviewStatus::Cancelled);
    assert!(cancelled.start_time.is_some());
    assert!(cancelled.end_time.is_none());

    let finished = service.create(6, 8).await.unwrap().id;
    service.start(finished).await.unwrap();
    service.end(finished).await.unwrap();
    assert!(matches!(
        service.cancel(finished).await,
        Err(Error::InvalidTransition { .. })
    ));
    assert!(matches!(
        service.start(finished).await,
        Err(Error::InvalidTransition { .. })
    ));
    assert!(service.end(finished).await.unwrap());
    assert_eq!(
        service.get(finished).await.unwrap().status,
        InterviewStatus::Completed
    );
}

#[tokio::test]
async fn lists_filter_and_order_by_id() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let candidate_id = common::unique_id();
    let jd_id = common::unique_id();

    let first = service.create(candidate_id, jd_id).await.unwrap().id;
    let second = service.create(candidate_id, jd_id).await.unwrap().id;
    let third = service.create(candidate_id, 1).await.unwrap().id;
    service.start(second).await.unwrap();

    let scheduled = service
        .list_by_status(InterviewStatus::Scheduled)
        .await
        .unwrap();
    assert!(scheduled
        .iter()
        .all(|i| i.status == InterviewStatus::Scheduled));
    assert!(scheduled.windows(2).all(|w| w[0].id < w[1].id));
    let ids: Vec<i32> = scheduled.iter().map(|i| i.id).collect();
    assert!(ids.contains(&first) && ids.contains(&third));
    assert!(!ids.contains(&second));

    let by_candidate: Vec<i32> = service
        .list_by_candidate(candidate_id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(by_candidate, vec![first, second, third]);

    let by_jd: Vec<i32> = service
        .list_by_jd(jd_id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(by_jd, vec![first, second]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_are_not_lost() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = common::service(&pool);
    let id = service.create(9, 9).await.unwrap().id;
    service.start(id).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|n| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .append_qa(id, &format!("Q{}", n), &format!("A{}", n), None)
                    .await
            })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }

    let transcript = service.get_transcript(id).await.unwrap();
    assert_eq!(transcript.len(), 8);
    for n in 0..8 {
        let question = format!("Q{}", n);
        assert!(transcript.iter().any(|e| e.question == question));
    }
}

#[tokio::test]
async fn schema_provisioning_checks_prerequisites() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };

    ensure_interview_schema(&pool, &SchemaRequirements::default())
        .await
        .unwrap();
    ensure_interview_schema(&pool, &SchemaRequirements::default())
        .await
        .unwrap();

    let absent = SchemaRequirements {
        candidate_table: "shortlisted_candidate".to_string(),
        jd_table: "jd_table_that_does_not_exist".to_string(),
    };
    match ensure_interview_schema(&pool, &absent).await {
        Err(Error::PrerequisiteMissing(tables)) => {
            assert_eq!(tables, "jd_table_that_does_not_exist")
        }
        other => panic!("expected PrerequisiteMissing, got {:?}", other.err()),
    }
}
