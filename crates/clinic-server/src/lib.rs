//! HTTP server assembly for the clinic appointment API.
//!
//! The binary in `main.rs` loads a [`ServerConfig`], opens the SQLite
//! storage area, and serves [`app`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use clinic_core::{
  area::StorageArea,
  settings::{DEFAULT_SETTINGS_KEY, SettingsStore},
  store::{AppointmentStore, DEFAULT_STORAGE_KEY},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CLINIC_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  /// SQLite file holding the storage area. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Key the appointment dataset is stored under.
  #[serde(default = "default_storage_key")]
  pub storage_key:  String,
  /// Key the site settings are stored under.
  #[serde(default = "default_settings_key")]
  pub settings_key: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("clinic.sqlite3") }

fn default_storage_key() -> String { DEFAULT_STORAGE_KEY.to_string() }

fn default_settings_key() -> String { DEFAULT_SETTINGS_KEY.to_string() }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app<A>(
  store: Arc<AppointmentStore<A>>,
  settings: Arc<SettingsStore<A>>,
) -> Router
where
  A: StorageArea + 'static,
{
  Router::new()
    .nest("/api", clinic_api::api_router(store, settings))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use clinic_core::area::MemoryArea;
  use tower::ServiceExt as _;

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("port", 8080)
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("clinic.sqlite3"));
    assert_eq!(cfg.storage_key, "medicalClinicData");
    assert_eq!(cfg.settings_key, "clinicSettings");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn expand_tilde_leaves_plain_paths_alone() {
    let p = Path::new("/var/lib/clinic.sqlite3");
    assert_eq!(expand_tilde(p), p.to_path_buf());
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let area = MemoryArea::new();
    let store = Arc::new(AppointmentStore::new(area.clone()));
    let settings = Arc::new(SettingsStore::new(area));
    store.initialize().await.unwrap();

    let resp = app(store.clone(), settings.clone())
      .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats["total"], 0);

    let resp = app(store.clone(), settings.clone())
      .oneshot(Request::get("/api/settings").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app(store, settings)
      .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
