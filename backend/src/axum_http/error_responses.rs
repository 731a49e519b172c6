use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::usecases::{
    bank_statements::StatementError, payments::PaymentError, reconciliation::ReviewError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

/// Maps an unclassified repository error. Constraint violations come back as
/// a client error so a bad id never reads as a server fault.
fn classify_unexpected(error: anyhow::Error) -> AppError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let Some(DieselError::DatabaseError(kind, _)) = error.downcast_ref::<DieselError>() {
        match kind {
            DatabaseErrorKind::UniqueViolation => {
                return AppError::BadRequest("record already exists".to_string());
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                return AppError::BadRequest("referenced record does not exist".to_string());
            }
            _ => {}
        }
    }

    AppError::Internal(error.to_string())
}

impl From<PaymentError> for AppError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::ApplicationsNotFound(_)
            | PaymentError::PaymentNotFound(_)
            | PaymentError::ApplicationNotFound(_) => AppError::NotFound(error.to_string()),
            PaymentError::Unexpected(inner) => classify_unexpected(inner),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(error: ReviewError) -> Self {
        match error {
            ReviewError::ReconciliationNotFound(_)
            | ReviewError::PaymentNotFound(_)
            | ReviewError::NoApplications(_) => AppError::NotFound(error.to_string()),
            ReviewError::Unexpected(inner) => classify_unexpected(inner),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<StatementError> for AppError {
    fn from(error: StatementError) -> Self {
        match error {
            StatementError::EmptyStatement => AppError::BadRequest(error.to_string()),
            StatementError::Unexpected(inner) => classify_unexpected(inner),
        }
    }
}
