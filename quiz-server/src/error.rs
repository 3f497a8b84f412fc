use quiz_types::QuizError;
use thiserror::Error;

/// Request-level failure: either a rejection surfaced to the client with its
/// message, or an internal storage failure reported as a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.message())]
    Rejected(QuizError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        ApiError::Rejected(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
