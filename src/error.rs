use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    Io,
    Fetch,
    Parse,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct ViewerError {
    pub code: ErrorCode,
    pub message: String,
}

impl ViewerError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::new(ErrorCode::Parse, err.to_string())
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::new(ErrorCode::Io, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
