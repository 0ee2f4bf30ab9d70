//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use clinic_core::{
  area::StorageArea, lifecycle::AppointmentStats, store::AppointmentStore,
};

use crate::error::ApiError;

/// `GET /stats`: totals per status, as shown on the admin dashboard.
pub async fn handler<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
) -> Result<Json<AppointmentStats>, ApiError> {
  Ok(Json(store.compute_stats().await?))
}
