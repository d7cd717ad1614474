use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wrapper shared by every successful backend response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Error body as sent by the backend; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    pub timestamp: Option<String>,
    pub api_version: Option<String>,
    pub validation_errors: Option<Vec<FieldViolation>>,
}

/// A single field rejected by server-side validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    #[serde(default)]
    pub rejected_value: Option<serde_json::Value>,
    pub message: String,
}

/// Error details with every field filled in, using per-status defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub error: String,
    pub message: String,
    pub path: String,
    pub timestamp: String,
    pub api_version: String,
    pub validation_errors: Vec<FieldViolation>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server could not be reached at all
    #[error("{}", .0.message)]
    Network(ErrorDetails),
    /// 401, the session token was rejected
    #[error("{}", .0.message)]
    Unauthorized(ErrorDetails),
    /// 403
    #[error("{}", .0.message)]
    Forbidden(ErrorDetails),
    /// 404
    #[error("{}", .0.message)]
    NotFound(ErrorDetails),
    /// 400 or 422, may carry per-field violations
    #[error("{}", .0.message)]
    Validation(ErrorDetails),
    /// 5xx
    #[error("{}", .1.message)]
    Server(u16, ErrorDetails),
    /// Any other non-success status
    #[error("{}", .1.message)]
    UnknownStatus(u16, ErrorDetails),
    /// A 2xx envelope whose status is not `success`
    #[error("{message}")]
    Rejected { status: String, message: String },
    /// A 2xx response that does not follow the envelope contract
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    /// A 2xx response whose payload could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::Network(d)
            | ApiError::Unauthorized(d)
            | ApiError::Forbidden(d)
            | ApiError::NotFound(d)
            | ApiError::Validation(d)
            | ApiError::Server(_, d)
            | ApiError::UnknownStatus(_, d) => Some(d),
            ApiError::Rejected { .. } | ApiError::InvalidResponse(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
