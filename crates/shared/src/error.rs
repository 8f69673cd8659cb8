use serde::{Deserialize, Serialize};

/// Envelope status the backend stamps on every JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Best-effort shape of a non-2xx JSON body from the backend.
///
/// The backend wraps any handler exception as `{"status": "error",
/// "message": <text>}`; callers fall back to the HTTP status line when the
/// body does not parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}
