use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::interview::{Interview, InterviewStatus};
use crate::models::transcript::{not_blank, Evaluation, QaEntry};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInterviewRequest {
    #[validate(range(min = 1))]
    pub candidate_id: i32,
    #[validate(range(min = 1))]
    pub jd_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AppendQaRequest {
    #[validate(custom(function = "not_blank"))]
    pub question: String,
    #[validate(custom(function = "not_blank"))]
    pub answer: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub evaluation: Option<Evaluation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppendQaResponse {
    pub saved: bool,
    pub interview_id: i32,
}

/// Exactly one filter is applied; `status` wins over `candidate_id`, which wins over `jd_id`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InterviewListQuery {
    pub status: Option<InterviewStatus>,
    pub candidate_id: Option<i32>,
    pub jd_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewResponse {
    pub id: i32,
    pub candidate_id: i32,
    pub jd_id: i32,
    pub status: InterviewStatus,
    pub transcript: Vec<QaEntry>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            candidate_id: interview.candidate_id,
            jd_id: interview.jd_id,
            status: interview.status,
            transcript: interview.transcript,
            start_time: interview.start_time,
            end_time: interview.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewListResponse {
    pub items: Vec<InterviewResponse>,
    pub total: usize,
}

impl From<Vec<Interview>> for InterviewListResponse {
    fn from(interviews: Vec<Interview>) -> Self {
        let items: Vec<InterviewResponse> =
            interviews.into_iter().map(InterviewResponse::from).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptResponse {
    pub interview_id: i32,
    pub entries: Vec<QaEntry>,
}
