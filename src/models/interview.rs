use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::Error;
use crate::models::transcript::{QaEntry, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 4] = [
        InterviewStatus::Scheduled,
        InterviewStatus::InProgress,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }

    /// Re-entering `in_progress`, `completed` or `cancelled` is allowed and re-stamps
    /// the matching timestamp; nothing ever returns to `scheduled`.
    pub fn can_transition_to(self, target: InterviewStatus) -> bool {
        use InterviewStatus::*;
        match target {
            Scheduled => false,
            InProgress => matches!(self, Scheduled | InProgress),
            Completed => matches!(self, InProgress | Completed),
            Cancelled => !self.is_terminal() || self == Cancelled,
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                Error::Database(sqlx::Error::Decode(
                    format!("Unknown interview status: {}", s).into(),
                ))
            })
    }
}

/// Row shape of the `interviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: i32,
    pub candidate_id: i32,
    pub jd_id: i32,
    pub transcript: Option<String>,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i32,
    pub candidate_id: i32,
    pub jd_id: i32,
    pub status: InterviewStatus,
    pub transcript: Vec<QaEntry>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = Error;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            candidate_id: row.candidate_id,
            jd_id: row.jd_id,
            status: row.status.parse()?,
            transcript: Transcript::decode(row.transcript.as_deref())?.into_entries(),
            start_time: row.start_time,
            end_time: row.end_time,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewInterview {
    #[validate(range(min = 1))]
    pub candidate_id: i32,
    #[validate(range(min = 1))]
    pub jd_id: i32,
}
