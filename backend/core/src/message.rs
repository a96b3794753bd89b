use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ActivityError, Result};

/// Extras key carrying the originating user's identifier.
pub const USER_ID_EXTRA: &str = "user_id";

/// A message delivered by the host, as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub priority: i32,
    /// Free-form side channel; one entry identifies the user.
    #[serde(default)]
    pub extras: HashMap<String, serde_json::Value>,
}

impl InboundMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Default::default() }
    }

    /// Attach the user identifier extra.
    pub fn from_user(mut self, user_id: impl Into<String>) -> Self {
        self.extras
            .insert(USER_ID_EXTRA.to_string(), serde_json::Value::String(user_id.into()));
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Typed extraction of the originating user.
    ///
    /// Fails with `InvalidEvent` when the extra is absent, not a string, or
    /// empty.
    pub fn user_id(&self) -> Result<&str> {
        match self.extras.get(USER_ID_EXTRA) {
            None => Err(ActivityError::InvalidEvent(format!(
                "missing '{USER_ID_EXTRA}' extra"
            ))),
            Some(serde_json::Value::String(id)) if id.is_empty() => Err(
                ActivityError::InvalidEvent(format!("'{USER_ID_EXTRA}' extra is empty")),
            ),
            Some(serde_json::Value::String(id)) => Ok(id.as_str()),
            Some(other) => Err(ActivityError::InvalidEvent(format!(
                "'{USER_ID_EXTRA}' extra must be a string, got {}",
                json_type_name(other)
            ))),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
