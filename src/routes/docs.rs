use axum::Json;
use utoipa::OpenApi;

use crate::dto::interview_dto::{
    AppendQaRequest, AppendQaResponse, CreateInterviewRequest, InterviewListResponse,
    InterviewResponse, TranscriptResponse,
};
use crate::models::interview::InterviewStatus;
use crate::models::transcript::QaEntry;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::interview::create_interview,
        super::interview::list_interviews,
        super::interview::get_interview,
        super::interview::start_interview,
        super::interview::append_qa,
        super::interview::end_interview,
        super::interview::cancel_interview,
        super::interview::get_transcript,
    ),
    components(schemas(
        CreateInterviewRequest,
        AppendQaRequest,
        AppendQaResponse,
        InterviewResponse,
        InterviewListResponse,
        TranscriptResponse,
        InterviewStatus,
        QaEntry,
    )),
    tags((name = "interviews", description = "Interview lifecycle and transcripts"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
