use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::routes::ApiResponse;
use crate::validation::ValidationError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{model} not found: {id}")]
    NotFound { model: &'static str, id: i64 },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Sequence allocation failed: {0}")]
    Allocation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn not_found(model: &'static str, id: i64) -> Self {
        AppError::NotFound { model, id }
    }

    /// Message shown to API callers. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::NotFound { model, .. } => format!("{} not found", model),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Json(err) => format!("Invalid JSON: {}", err),
            AppError::Allocation(_) => "Sequence allocation failed".to_string(),
            AppError::Database(_) => "Database error".to_string(),
        }
    }
}

/// Errors are rendered as the failure envelope; the HTTP status stays 200.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Allocation(msg) => {
                tracing::error!("{}: {}", self.public_message(), msg);
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
            }
            _ => tracing::debug!("Request failed: {}", self),
        }

        let body = ApiResponse::<()>::failure(self.public_message());
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

/// Helper trait for converting Option to AppError::NotFound
pub trait OptionExt<T> {
    fn ok_or_not_found(self, model: &'static str, id: i64) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, model: &'static str, id: i64) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(model, id))
    }
}
