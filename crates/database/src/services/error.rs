use models::term::TermError;
use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a service operation, classified by what the caller did wrong
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input, or a request the term calendar forbids
    #[error("{0}")]
    Validation(String),

    /// The entity does not exist or is not visible to the caller
    #[error("{0}")]
    NotFound(String),

    /// The request would duplicate an existing resource or enrollment
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<TermError> for ServiceError {
    fn from(err: TermError) -> Self {
        Self::Validation(err.to_string())
    }
}
