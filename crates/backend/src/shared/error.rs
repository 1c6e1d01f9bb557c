use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::api_error::ErrorResponse;
use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

use crate::shared::data::db::is_unique_violation;

/// Error returned by services and handlers
///
/// Client errors carry a message that is sent back verbatim; internal errors
/// are logged and answered with a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Account is locked due to too many failed login attempts. Try again later.")]
    Locked,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found<A: AggregateRoot>() -> Self {
        AppError::NotFound(format!("{} not found", A::element_name()))
    }

    pub fn invalid_id(id: &str) -> Self {
        AppError::Validation(format!("Invalid id '{}'", id))
    }

    /// Map a failed write: unique violations become a conflict with `message`
    pub fn from_write(err: anyhow::Error, message: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            AppError::Conflict(message.into())
        } else {
            AppError::Internal(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Locked => StatusCode::LOCKED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<TransactionError<AppError>> for AppError {
    fn from(err: TransactionError<AppError>) -> Self {
        match err {
            TransactionError::Connection(e) => e.into(),
            TransactionError::Transaction(e) => e,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Locked.status(), StatusCode::LOCKED);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_plain_write_error_is_internal() {
        let err = AppError::from_write(anyhow::anyhow!("disk full"), "Phone number already exists");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
