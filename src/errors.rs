use axum::http::StatusCode;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("remote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed remote payload: {0}")]
    Malformed(String),

    #[error("remote timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("unknown habit: {0}")]
    UnknownHabit(String),

    #[error("score must be between 1 and 10, got {0}")]
    ScoreOutOfRange(i64),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::UnknownHabit(_) => Self::not_found(err.to_string()),
            TrackerError::ScoreOutOfRange(_) => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
