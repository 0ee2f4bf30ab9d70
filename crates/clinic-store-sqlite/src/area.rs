//! [`SqliteArea`]: the SQLite implementation of [`StorageArea`].

use std::path::Path;

use clinic_core::area::StorageArea;
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

/// A storage area backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteArea {
  conn: tokio_rusqlite::Connection,
}

impl SqliteArea {
  /// Open (or create) an area at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let area = Self { conn };
    area.init_schema().await?;
    Ok(area)
  }

  /// Open an in-memory area, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let area = Self { conn };
    area.init_schema().await?;
    Ok(area)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite storage schema ready");
    Ok(())
  }
}

impl StorageArea for SqliteArea {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM storage WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(value)
  }

  async fn set(&self, key: &str, value: String) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO storage (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
