//! Feedback Model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::util::date_part;

/// Feedback tone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown sentiment: {0}")]
pub struct UnknownSentiment(pub String);

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(UnknownSentiment(other.to_string())),
        }
    }
}

/// Feedback entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub employee_id: String,
    #[serde(default)]
    pub manager_employee_id: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvement: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default, deserialize_with = "comment_list")]
    pub comments: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Feedback {
    /// Creation date without the time part
    pub fn created_on(&self) -> Option<&str> {
        self.created_at.as_deref().map(date_part)
    }
}

/// Create feedback payload (`POST /feedback/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_employee_id: Option<String>,
    pub strengths: String,
    pub improvement: String,
    pub sentiment: Sentiment,
    pub anonymous: bool,
    pub tags: Vec<String>,
}

/// Edit feedback payload (`PUT /feedback/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    pub manager_employee_id: String,
    pub employee_id: String,
    pub strengths: String,
    pub improvement: String,
    pub sentiment: Sentiment,
    pub anonymous: bool,
    pub tags: Vec<String>,
}

impl FeedbackUpdate {
    /// Start an edit from an existing entry
    pub fn from_feedback(feedback: &Feedback, manager_employee_id: impl Into<String>) -> Self {
        Self {
            manager_employee_id: manager_employee_id.into(),
            employee_id: feedback.employee_id.clone(),
            strengths: feedback.strengths.clone(),
            improvement: feedback.improvement.clone(),
            sentiment: feedback.sentiment,
            anonymous: feedback.anonymous,
            tags: feedback.tags.clone(),
        }
    }

    /// Apply this update to a local copy (used for optimistic edits).
    pub fn apply_to(&self, feedback: &mut Feedback) {
        feedback.employee_id = self.employee_id.clone();
        feedback.strengths = self.strengths.clone();
        feedback.improvement = self.improvement.clone();
        feedback.sentiment = self.sentiment;
        feedback.anonymous = self.anonymous;
        feedback.tags = self.tags.clone();
    }
}

/// Comment payload (`POST /feedback/comment/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub comment: String,
}

// The backend has returned comments as null, a single string, a list of
// strings and a list of `{comment: ..}` objects. Normalise to a list.
fn comment_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items.into_iter().filter_map(comment_text).collect(),
        Some(other) => comment_text(other).into_iter().collect(),
    })
}

fn comment_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj
            .get("comment")
            .or_else(|| obj.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
