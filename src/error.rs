//! Crate-wide error type.
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid {field}: {0}", field = .0.field())]
    Validation(#[from] ValidationError),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn internal<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return AppError::ConstraintViolation(db_err.message().to_string());
            }
        }
        AppError::internal(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
