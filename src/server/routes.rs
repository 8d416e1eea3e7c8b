use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::error::ApiError;
use crate::db::{OverlayStore, UpdateOutcome};
use crate::types::{Overlay, OverlayDraft, OverlayPatch};

/// Build the overlay API router with permissive CORS, suitable both for
/// `axum::serve` and for in-process tests via `tower::ServiceExt`.
pub fn build_router(store: Arc<OverlayStore>) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  Router::new()
    .route("/", get(home))
    .route("/api/overlays", post(create_overlay).get(list_overlays))
    .route(
      "/api/overlays/{id}",
      put(update_overlay).delete(delete_overlay),
    )
    .layer(cors)
    .with_state(store)
}

#[derive(Serialize)]
struct HomeResponse {
  message: &'static str,
  status: &'static str,
}

#[derive(Serialize)]
struct OverlayResponse {
  message: &'static str,
  overlay: Overlay,
}

#[derive(Serialize)]
struct ListResponse {
  overlays: Vec<Overlay>,
}

#[derive(Serialize)]
struct DeleteResponse {
  message: &'static str,
  deleted_id: String,
}

/// GET / - liveness check
async fn home() -> Json<HomeResponse> {
  Json(HomeResponse {
    message: "Livestream Overlay API is live",
    status: "success",
  })
}

/// POST /api/overlays - create an overlay, defaults filled server-side
async fn create_overlay(
  State(store): State<Arc<OverlayStore>>,
  draft: Result<Json<OverlayDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<OverlayResponse>), ApiError> {
  // The original service treats a bad creation body as an internal
  // failure rather than a 400; only PUT validates its payload.
  let Json(draft) = draft.map_err(|rejection| ApiError::Internal {
    message: "Failed to create overlay.".into(),
    details: rejection.to_string(),
  })?;

  let overlay = store
    .create(draft)
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to create overlay."))?;

  Ok((
    StatusCode::CREATED,
    Json(OverlayResponse {
      message: "Overlay created!",
      overlay,
    }),
  ))
}

/// GET /api/overlays - the whole collection, order unspecified
async fn list_overlays(
  State(store): State<Arc<OverlayStore>>,
) -> Result<Json<ListResponse>, ApiError> {
  let overlays = store
    .list()
    .await
    .map_err(|e| ApiError::from_store(e, "Internal server error fetching data."))?;
  Ok(Json(ListResponse { overlays }))
}

/// PUT /api/overlays/{id} - field-level merge of the whitelisted fields
async fn update_overlay(
  State(store): State<Arc<OverlayStore>>,
  Path(id): Path<String>,
  patch: Result<Json<OverlayPatch>, JsonRejection>,
) -> Result<Json<OverlayResponse>, ApiError> {
  // Availability is checked before the payload so a degraded store
  // answers 503 for every request shape.
  if !store.is_available().await {
    return Err(ApiError::Unavailable);
  }

  // Missing or unparseable body: reject before any storage access.
  let Json(patch) = patch.map_err(|rejection| {
    tracing::warn!("rejected update for overlay {}: {}", id, rejection);
    ApiError::BadRequest
  })?;

  let outcome = store
    .update(&id, patch)
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to update overlay."))?;

  let response = match outcome {
    UpdateOutcome::Updated(overlay) => OverlayResponse {
      message: "Overlay updated!",
      overlay,
    },
    UpdateOutcome::Unchanged(overlay) => OverlayResponse {
      message: "No change needed.",
      overlay,
    },
  };
  Ok(Json(response))
}

/// DELETE /api/overlays/{id} - remove and confirm with the id
async fn delete_overlay(
  State(store): State<Arc<OverlayStore>>,
  Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
  store
    .delete(&id)
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to delete overlay."))?;

  Ok(Json(DeleteResponse {
    message: "Deleted",
    deleted_id: id,
  }))
}
