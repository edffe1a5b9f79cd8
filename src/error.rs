use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for TrackerError {
    fn from(errors: ValidationErrors) -> Self {
        TrackerError::Validation(errors.to_string())
    }
}

impl TrackerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrackerError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrackerError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error, message) = match &self {
            // Storage details stay in the logs.
            TrackerError::Persistence(_) | TrackerError::Internal(_) => (
                "internal_error",
                "Something went wrong, please try again".to_string(),
            ),
            TrackerError::MissingField(_) => ("missing_field", self.to_string()),
            TrackerError::Validation(_) => ("validation_error", self.to_string()),
            TrackerError::NotFound(_) => ("not_found", self.to_string()),
        };

        let body = Json(json!({
            "error": error,
            "message": message,
        }));

        (status, body).into_response()
    }
}
