//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] clinic_core::Error),
}

impl From<clinic_core::Error> for ApiError {
  fn from(e: clinic_core::Error) -> Self {
    match e {
      clinic_core::Error::InvalidTransition { .. } => Self::Conflict(e.to_string()),
      other => Self::Store(other),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, retryable) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone(), false),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone(), false),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone(), false),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        let message = if e.is_retryable() {
          "Clinic storage is unavailable. Please try again."
        } else {
          "An internal error occurred while handling the request."
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned(), e.is_retryable())
      }
    };
    (status, Json(json!({ "error": message, "retryable": retryable })))
      .into_response()
  }
}
