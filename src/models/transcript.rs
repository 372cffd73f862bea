use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::Result;

pub type Evaluation = Map<String, JsonValue>;

/// One question/answer turn of an interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "crate::utils::time::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_evaluation")]
    #[schema(value_type = Object)]
    pub evaluation: Evaluation,
}

fn deserialize_evaluation<'de, D>(deserializer: D) -> std::result::Result<Evaluation, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Evaluation>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rejects text that is empty once surrounding whitespace is trimmed.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A QA entry as submitted, before the server stamps it.
#[derive(Debug, Clone, Validate)]
pub struct NewQaEntry {
    #[validate(custom(function = "not_blank"))]
    pub question: String,
    #[validate(custom(function = "not_blank"))]
    pub answer: String,
    pub evaluation: Evaluation,
}

impl NewQaEntry {
    pub fn stamp(self, timestamp: DateTime<Utc>) -> QaEntry {
        QaEntry {
            question: self.question,
            answer: self.answer,
            timestamp,
            evaluation: self.evaluation,
        }
    }
}

/// Ordered, append-only log of QA entries, stored as a JSON array in a text column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<QaEntry>,
}

impl Transcript {
    /// A missing or blank column decodes to an empty transcript.
    pub fn decode(raw: Option<&str>) -> Result<Self> {
        let entries = match raw.map(str::trim) {
            None | Some("") => Vec::new(),
            Some(text) => serde_json::from_str(text)?,
        };
        Ok(Self { entries })
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn push(&mut self, entry: QaEntry) {
        self.entries.push(entry);
    }

    pub fn into_entries(self) -> Vec<QaEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
