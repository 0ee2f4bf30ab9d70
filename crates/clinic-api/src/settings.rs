//! Handlers for `/settings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings` | Every category; defaults until something is saved |
//! | `GET`  | `/settings/{category}` | 404 if the category does not exist |
//! | `PUT`  | `/settings/{category}` | Body: a JSON object; replaces the category |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use clinic_core::{
  area::StorageArea,
  settings::{Category, Settings, SettingsStore},
};

use crate::error::ApiError;

/// `GET /settings`
pub async fn get_all<A: StorageArea>(
  State(store): State<Arc<SettingsStore<A>>>,
) -> Result<Json<Settings>, ApiError> {
  Ok(Json(store.load().await?))
}

/// `GET /settings/{category}`
pub async fn get_category<A: StorageArea>(
  State(store): State<Arc<SettingsStore<A>>>,
  Path(name): Path<String>,
) -> Result<Json<Category>, ApiError> {
  let category = store.category(&name).await?.ok_or_else(|| {
    ApiError::NotFound(format!("settings category {name} not found"))
  })?;
  Ok(Json(category))
}

/// `PUT /settings/{category}`. Returns the full settings after the save.
pub async fn put_category<A: StorageArea>(
  State(store): State<Arc<SettingsStore<A>>>,
  Path(name): Path<String>,
  body: Result<Json<Category>, JsonRejection>,
) -> Result<Json<Settings>, ApiError> {
  let Json(fields) = body?;
  if name.trim().is_empty() {
    return Err(ApiError::BadRequest("category is required.".into()));
  }
  Ok(Json(store.save_category(&name, fields).await?))
}
