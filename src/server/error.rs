use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// User-facing error taxonomy for the overlay API.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The store never initialized; checked before any operation.
  #[error("Database not available. Check server logs.")]
  Unavailable,
  #[error("Invalid JSON data received.")]
  BadRequest,
  #[error("Overlay not found")]
  NotFound,
  /// Unexpected storage/I-O failure during an otherwise valid operation.
  #[error("{message}")]
  Internal { message: String, details: String },
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<String>,
}

impl ApiError {
  /// Translate a store failure at the operation boundary. `action` is the
  /// operation-specific message shown for unexpected failures.
  pub fn from_store(err: StoreError, action: &str) -> Self {
    match err {
      StoreError::Unavailable => Self::Unavailable,
      StoreError::NotFound(_) => Self::NotFound,
      other => Self::Internal {
        message: action.to_string(),
        details: other.to_string(),
      },
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
      Self::BadRequest => StatusCode::BAD_REQUEST,
      Self::NotFound => StatusCode::NOT_FOUND,
      Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let details = match &self {
      ApiError::Internal { details, .. } => Some(details.clone()),
      _ => None,
    };
    let body = ErrorBody {
      error: self.to_string(),
      details,
    };
    (self.status(), Json(body)).into_response()
  }
}
