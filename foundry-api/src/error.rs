use crate::storage::StorageError;
use actix_web::{HttpResponse, ResponseError};
use shared_types::ErrorResponse;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => ApiError::NotFound(msg),
            StorageError::Conflict(msg) => ApiError::Conflict(msg),
            StorageError::Constraint(msg) => ApiError::Constraint(msg),
            other => ApiError::Storage(other),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };

        match self {
            ApiError::Validation(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error_response),
            ApiError::Conflict(_) => HttpResponse::Conflict().json(error_response),
            ApiError::Constraint(_) => HttpResponse::UnprocessableEntity().json(error_response),
            ApiError::Storage(e) => {
                error!(error = %e, "Storage operation failed");
                HttpResponse::InternalServerError().json(error_response)
            }
        }
    }
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Constraint(_) => "constraint_error",
            ApiError::Storage(_) => "storage_error",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
