//! clinic-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CLINIC_*`
//! environment variables, opens the SQLite storage area, and serves the
//! appointment API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use clinic_core::{settings::SettingsStore, store::AppointmentStore};
use clinic_server::{ServerConfig, app, expand_tilde};
use clinic_store_sqlite::SqliteArea;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Clinic appointment server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CLINIC"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);

  let area = SqliteArea::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let settings_store =
    SettingsStore::with_key(area.clone(), server_cfg.settings_key.clone());
  let store = AppointmentStore::with_key(area, server_cfg.storage_key.clone());
  store
    .initialize()
    .await
    .context("failed to initialise appointment dataset")?;

  let app = app(Arc::new(store), Arc::new(settings_store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
