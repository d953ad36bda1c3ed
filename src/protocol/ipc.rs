//! Result envelope returned to the UI

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HistoryResult;

/// `{ "ok": true, "data": ... }` or `{ "ok": false, "error": "..." }`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IpcReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpcReply {
    /// Successful reply with no payload
    pub fn ok() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    /// Successful reply carrying `data`
    pub fn data<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self::ok(),
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error: None,
            },
            Err(e) => Self::error(format!("Failed to encode reply: {}", e)),
        }
    }

    /// Failed reply with a user-facing message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Envelope for an operation result
    pub fn from_result<T: Serialize>(result: HistoryResult<T>) -> Self {
        match result {
            Ok(data) => Self::data(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Name and version reported by `initialize`
#[derive(Serialize, Clone, Debug)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(crate::NAME, crate::VERSION)
    }
}
