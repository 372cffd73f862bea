use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::interview_dto::{
        AppendQaRequest, AppendQaResponse, CreateInterviewRequest, InterviewListQuery,
        InterviewListResponse, InterviewResponse, TranscriptResponse,
    },
    error::{Error, Result},
    AppState,
};

fn not_found(id: i32) -> Error {
    Error::NotFound(format!("Interview {} not found", id))
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Interview scheduled", body = InterviewResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Json(payload): Json<CreateInterviewRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .create(payload.candidate_id, payload.jd_id)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(InterviewListQuery),
    responses(
        (status = 200, description = "Interviews ordered by id", body = InterviewListResponse),
        (status = 400, description = "No filter supplied")
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let service = &state.interview_service;
    let interviews = match query {
        InterviewListQuery {
            status: Some(status),
            ..
        } => service.list_by_status(status).await?,
        InterviewListQuery {
            candidate_id: Some(candidate_id),
            ..
        } => service.list_by_candidate(candidate_id).await?,
        InterviewListQuery {
            jd_id: Some(jd_id), ..
        } => service.list_by_jd(jd_id).await?,
        _ => {
            return Err(Error::BadRequest(
                "One of status, candidate_id or jd_id is required".to_string(),
            ))
        }
    };
    Ok(Json(InterviewListResponse::from(interviews)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview found", body = InterviewResponse),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/start",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview in progress", body = InterviewResponse),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview already finished")
    )
)]
#[axum::debug_handler]
pub async fn start_interview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    if !state.interview_service.start(id).await? {
        return Err(not_found(id));
    }
    let interview = state.interview_service.get(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/qa",
    params(("id" = i32, Path, description = "Interview ID")),
    request_body = AppendQaRequest,
    responses(
        (status = 201, description = "Entry appended to the transcript", body = AppendQaResponse),
        (status = 400, description = "Empty question or answer"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn append_qa(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AppendQaRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let saved = state
        .interview_service
        .append_qa(id, &payload.question, &payload.answer, payload.evaluation)
        .await?;
    if !saved {
        return Err(not_found(id));
    }
    Ok((
        StatusCode::CREATED,
        Json(AppendQaResponse {
            saved,
            interview_id: id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/end",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview completed", body = InterviewResponse),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview was never started or was cancelled")
    )
)]
#[axum::debug_handler]
pub async fn end_interview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    if !state.interview_service.end(id).await? {
        return Err(not_found(id));
    }
    let interview = state.interview_service.get(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/cancel",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview cancelled", body = InterviewResponse),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview already completed")
    )
)]
#[axum::debug_handler]
pub async fn cancel_interview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    if !state.interview_service.cancel(id).await? {
        return Err(not_found(id));
    }
    let interview = state.interview_service.get(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}/transcript",
    params(("id" = i32, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Transcript entries in append order; empty for unknown ids", body = TranscriptResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let entries = state.interview_service.get_transcript(id).await?;
    Ok(Json(TranscriptResponse {
        interview_id: id,
        entries,
    }))
}
