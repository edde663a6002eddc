//! Uniform `{success, text, error}` reply handed back to callers.

use quill_core::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Vendor error code, when the remote service supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
}

impl ServiceReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
            error_code: None,
        }
    }

    pub fn failure(error: impl Into<String>, error_code: Option<i64>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
            error_code,
        }
    }
}

impl From<Result<String>> for ServiceReply {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::ok(text),
            Err(Error::Service { code, message }) => Self::failure(message, code),
            Err(e) => Self::failure(e.to_string(), None),
        }
    }
}
