//! Meeting and feedback records owned by the backend.
//!
//! The backend is loose about id types: the same meeting id may show up as a
//! JSON string in one collection and as a number in another. [`RecordId`]
//! keeps whatever was sent and compares through a normalized string key.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// A record identifier sent either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(Number),
}

impl RecordId {
    /// Returns the normalized string form used for comparisons.
    ///
    /// Integral numbers render without a fractional part, so `7`, `7.0` and
    /// `"7"` all share the key `"7"`.
    pub fn key(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
                }
            }
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// A meeting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// `None` when the id is absent or neither a string nor a number. Such a
    /// meeting still counts toward its owner's total.
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub meeting_id: Option<RecordId>,
    /// Owner id, kept as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meeting {
    /// Creates a meeting owned by `user_id`.
    pub fn new(meeting_id: impl Into<RecordId>, user_id: impl Into<String>) -> Self {
        Self {
            meeting_id: Some(meeting_id.into()),
            user_id: Some(Value::String(user_id.into())),
            extra: Map::new(),
        }
    }

    /// Returns the normalized id key, if the meeting has a usable id.
    pub fn key(&self) -> Option<String> {
        self.meeting_id.as_ref().map(RecordId::key)
    }

    /// Returns the id for display, `-` when it has none.
    pub fn display_id(&self) -> String {
        self.key().unwrap_or_else(|| "-".to_string())
    }

    /// Returns true if this meeting belongs to `user_id`.
    ///
    /// The comparison is strict: an owner id sent as a number never matches.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        matches!(&self.user_id, Some(Value::String(owner)) if owner == user_id)
    }
}

/// A feedback submission for a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub meeting_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<FeedbackResponses>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answers in a feedback submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_satisfaction: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feedback {
    /// Creates a feedback record with an overall satisfaction score.
    pub fn new(meeting_id: impl Into<RecordId>, overall_satisfaction: impl Into<Value>) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            responses: Some(FeedbackResponses {
                overall_satisfaction: Some(overall_satisfaction.into()),
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// Returns the overall satisfaction score when it is a JSON number.
    pub fn rating(&self) -> Option<f64> {
        self.responses
            .as_ref()
            .and_then(|r| r.overall_satisfaction.as_ref())
            .and_then(Value::as_f64)
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(RecordId::Text(s)),
        Value::Number(n) => Some(RecordId::Number(n)),
        _ => None,
    })
}

/// Decodes a JSON collection, skipping elements that do not match `T`.
///
/// Returns `None` when `value` is not an array.
pub fn decode_collection<T: DeserializeOwned>(value: Value, kind: &str) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        return None;
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| warn!(kind, index, error = %e, "skipping malformed record"))
                .ok()
        })
        .collect();

    if decoded.len() < total {
        warn!(kind, kept = decoded.len(), total, "dropped malformed records");
    }
    Some(decoded)
}
