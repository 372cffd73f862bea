use crate::database::schema::{ensure_interview_schema, SchemaRequirements};
use crate::error::{Error, Result};
use crate::models::interview::{Interview, InterviewRow, InterviewStatus, NewInterview};
use crate::models::transcript::{Evaluation, NewQaEntry, QaEntry, Transcript};
use crate::utils::time;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use validator::Validate;

const INTERVIEW_COLUMNS: &str =
    "id, candidate_id, jd_id, transcript, status, start_time, end_time";

/// Persistence and lifecycle rules for interviews.
///
/// Mutations report an unknown id as `Ok(false)`; only [`InterviewService::get`]
/// turns it into [`Error::NotFound`]. Every mutation runs in its own transaction,
/// which rolls back when dropped on an error path.
#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
    requirements: SchemaRequirements,
}

impl InterviewService {
    pub fn new(pool: PgPool, requirements: SchemaRequirements) -> Self {
        Self { pool, requirements }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        ensure_interview_schema(&self.pool, &self.requirements).await
    }

    pub async fn create(&self, candidate_id: i32, jd_id: i32) -> Result<Interview> {
        NewInterview { candidate_id, jd_id }.validate()?;

        let row = sqlx::query_as::<_, InterviewRow>(&format!(
            r#"
            INSERT INTO interviews (candidate_id, jd_id, transcript, status, start_time, end_time)
            VALUES ($1, $2, NULL, $3, NULL, NULL)
            RETURNING {INTERVIEW_COLUMNS}
            "#
        ))
        .bind(candidate_id)
        .bind(jd_id)
        .bind(InterviewStatus::Scheduled.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!(interview_id = row.id, candidate_id, jd_id, "Created interview");
        Interview::try_from(row)
    }

    pub async fn get(&self, id: i32) -> Result<Interview> {
        let row = sqlx::query_as::<_, InterviewRow>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))?;

        Interview::try_from(row)
    }

    pub async fn start(&self, id: i32) -> Result<bool> {
        self.transition(id, InterviewStatus::InProgress).await
    }

    pub async fn end(&self, id: i32) -> Result<bool> {
        self.transition(id, InterviewStatus::Completed).await
    }

    pub async fn cancel(&self, id: i32) -> Result<bool> {
        self.transition(id, InterviewStatus::Cancelled).await
    }

    async fn transition(&self, id: i32, target: InterviewStatus) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM interviews WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(false);
        };
        let current: InterviewStatus = current.parse()?;
        if !current.can_transition_to(target) {
            warn!(interview_id = id, from = %current, to = %target, "Rejected interview transition");
            return Err(Error::InvalidTransition {
                id,
                from: current,
                to: target,
            });
        }

        let now = time::now();
        let update = match target {
            InterviewStatus::InProgress => {
                sqlx::query("UPDATE interviews SET status = $1, start_time = $2 WHERE id = $3")
                    .bind(target.as_str())
                    .bind(now)
            }
            InterviewStatus::Completed => {
                sqlx::query("UPDATE interviews SET status = $1, end_time = $2 WHERE id = $3")
                    .bind(target.as_str())
                    .bind(now)
            }
            InterviewStatus::Cancelled | InterviewStatus::Scheduled => {
                sqlx::query("UPDATE interviews SET status = $1 WHERE id = $2")
                    .bind(target.as_str())
            }
        };
        update.bind(id).execute(&mut *tx).await?;
        tx.commit().await?;

        info!(interview_id = id, from = %current, to = %target, "Interview status updated");
        Ok(true)
    }

    /// Appends one QA entry stamped with the server time.
    ///
    /// The interview row stays locked from read to write, so concurrent appends
    /// to the same interview are serialized and none is lost.
    pub async fn append_qa(
        &self,
        id: i32,
        question: &str,
        answer: &str,
        evaluation: Option<Evaluation>,
    ) -> Result<bool> {
        let entry = NewQaEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            evaluation: evaluation.unwrap_or_default(),
        };
        entry.validate()?;

        let mut tx = self.pool.begin().await?;

        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT transcript FROM interviews WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(stored) = stored else {
            return Ok(false);
        };

        let mut transcript = Transcript::decode(stored.as_deref())?;
        if transcript.is_empty() {
            debug!(interview_id = id, "Starting interview transcript");
        }
        transcript.push(entry.stamp(time::now()));

        sqlx::query("UPDATE interviews SET transcript = $1 WHERE id = $2")
            .bind(transcript.encode()?)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(interview_id = id, entries = transcript.len(), "Added Q&A to interview");
        Ok(true)
    }

    /// Empty for an interview without entries and for an unknown id alike.
    pub async fn get_transcript(&self, id: i32) -> Result<Vec<QaEntry>> {
        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT transcript FROM interviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(Transcript::decode(stored.flatten().as_deref())?.into_entries())
    }

    pub async fn list_by_status(&self, status: InterviewStatus) -> Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE status = $1 ORDER BY id"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interview::try_from).collect()
    }

    pub async fn list_by_candidate(&self, candidate_id: i32) -> Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE candidate_id = $1 ORDER BY id"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interview::try_from).collect()
    }

    pub async fn list_by_jd(&self, jd_id: i32) -> Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE jd_id = $1 ORDER BY id"
        ))
        .bind(jd_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interview::try_from).collect()
    }
}
