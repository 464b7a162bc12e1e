//! Request-level error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::constants::{ALERT_INVALID_ACTION, ROOT_PATH};
use crate::domain::store::StoreError;
use crate::views::{Flash, Outcome};

#[derive(Debug, Error)]
pub enum AppError {
    /// No identity, or the identity does not own the resource
    #[error("invalid action")]
    Unauthorized,

    #[error("tweet not found")]
    NotFound,

    #[error("param is missing or the value is empty: {0}")]
    ParameterMissing(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => Outcome::Redirect {
                to: ROOT_PATH,
                flash: Flash::alert(ALERT_INVALID_ACTION),
            }
            .into_response(),
            AppError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Tweet not found"),
            AppError::ParameterMissing(param) => json_error(
                StatusCode::BAD_REQUEST,
                "parameter_missing",
                format!("param is missing or the value is empty: {}", param),
            ),
            // Create and update re-render their form on validation errors,
            // so only database failures reach this arm. Logged where raised.
            AppError::Store(_) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            ),
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
