use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;
use crate::validation::ValidationErrors;

/// Errors surfaced by commands
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("You need to sign in first")]
    NotSignedIn,
    #[error("{0}")]
    Usage(String),
    #[error("Request cancelled")]
    Cancelled,
}
