//! Backend error body parsing
//!
//! The backend reports failures as JSON carrying either a `detail` field
//! (a string, or a list of `{loc, msg}` validation items) or a `message`
//! field. Whatever it carries is surfaced to the user verbatim.

use serde::Deserialize;
use serde_json::Value;

/// Error response body returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body. Returns `None` when the text is not a JSON object.
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(text).ok()? {
            Value::Object(map) => serde_json::from_value(Value::Object(map)).ok(),
            _ => None,
        }
    }

    /// The user-facing message, `detail` first, then `message`.
    pub fn user_message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(detail_message)
            .or_else(|| self.message.clone().filter(|m| !m.trim().is_empty()))
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => {
            let parts: Vec<String> = items.iter().map(validation_item).collect();
            Some(parts.join("; "))
        }
        Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

// {"loc": ["body", "email"], "msg": "field required"} -> "body.email: field required"
fn validation_item(item: &Value) -> String {
    let msg = item.get("msg").and_then(Value::as_str);
    let loc = item.get("loc").and_then(Value::as_array).map(|parts| {
        parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    });

    match (loc, msg) {
        (Some(loc), Some(msg)) if !loc.is_empty() => format!("{}: {}", loc, msg),
        (_, Some(msg)) => msg.to_string(),
        _ => item.to_string(),
    }
}
