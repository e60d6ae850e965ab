use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::services::PublishError;
use crate::utils::response::error as error_response;
use crate::validation::{to_details, ValidationIssue};

pub const INVALID_BODY_MESSAGE: &str = "Purchase details are missing or invalid.";
pub const VALIDATION_FAILED_MESSAGE: &str = "One or more validation errors occurred.";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Internal error: queue connection string is not configured.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::Queue(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidBody(_) | AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Queue(_) => "QUEUE_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::InvalidBody(reason) => {
                warn!(reason = %reason, "Rejected purchase body");
            }
            AppError::Validation(issues) => {
                let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
                warn!(?fields, "Purchase failed validation");
            }
            AppError::Configuration(msg) | AppError::Queue(msg) | AppError::Internal(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
        }
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::NotConfigured => AppError::Configuration(NOT_CONFIGURED_MESSAGE.to_string()),
            PublishError::Serialization(e) => AppError::Internal(e.to_string()),
            PublishError::Queue(e) => AppError::Queue(format!(
                "Error occurred while processing the purchase: {e}"
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let (public_message, details) = match self {
            AppError::InvalidBody(reason) => (
                INVALID_BODY_MESSAGE.to_string(),
                Some(serde_json::json!({ "body": reason })),
            ),
            AppError::Validation(issues) => (
                VALIDATION_FAILED_MESSAGE.to_string(),
                Some(to_details(&issues)),
            ),
            AppError::Configuration(msg) | AppError::Queue(msg) => (msg, None),
            // Serialization internals stay in the log
            AppError::Internal(_) => ("An unexpected error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}
