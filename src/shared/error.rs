use crate::domain::deletion::DeletionError;
use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<DeletionError> for AppError {
    fn from(err: DeletionError) -> Self {
        match err {
            DeletionError::InvalidScope(value) => AppError::InvalidScope(format!(
                "deleteAccounts must be true or false, got {:?}",
                value
            )),
            other => AppError::InternalServerError(anyhow::anyhow!(other)),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(format!("Invalid path: {}", rejection.body_text()))
    }
}

/// Error body. `message` is what the directory client shows to the user.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: Vec<ApiError>,
}

#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl AppError {
    fn status_and_detail(self) -> (StatusCode, String) {
        match self {
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InvalidScope(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        let body = ErrorResponse {
            message: detail.clone(),
            errors: vec![ApiError {
                status: status.as_u16(),
                title: status
                    .canonical_reason()
                    .unwrap_or("Error")
                    .to_string(),
                detail,
            }],
        };

        (status, Json(body)).into_response()
    }
}
