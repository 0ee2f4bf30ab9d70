//! The `StorageArea` trait and an in-process implementation.
//!
//! A storage area is a flat key-value space of serialized strings with no
//! transactions: a value is read whole and overwritten whole. Backends that
//! outlive the process live in their own crates (e.g. `clinic-store-sqlite`).

use std::{
  collections::HashMap,
  future::Future,
  sync::{Arc, Mutex},
};

use thiserror::Error;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a persistent key-value area holding serialized blobs.
///
/// All methods return `Send` futures so an area can sit behind an axum
/// handler on a multi-threaded runtime.
pub trait StorageArea: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`. Returns `None` if the slot is empty.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Overwrite the value stored under `key`.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── MemoryArea ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryAreaError {
  #[error("quota exceeded: {needed} bytes needed, {quota} allowed")]
  QuotaExceeded { needed: usize, quota: usize },

  #[error("storage lock poisoned")]
  Poisoned,
}

/// A storage area held in process memory.
///
/// Clones share the same slots, so a test can keep one handle to inspect the
/// raw blob while a store owns another. An optional quota caps the total
/// size of all keys and values, mirroring a browser's per-origin limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryArea {
  slots: Arc<Mutex<HashMap<String, String>>>,
  quota: Option<usize>,
}

impl MemoryArea {
  pub fn new() -> Self { Self::default() }

  /// An area that rejects writes once keys and values together would exceed
  /// `bytes`.
  pub fn with_quota(bytes: usize) -> Self {
    Self { quota: Some(bytes), ..Self::default() }
  }

  /// Synchronous peek at a slot, bypassing the async trait.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.slots.lock().ok()?.get(key).cloned()
  }
}

impl StorageArea for MemoryArea {
  type Error = MemoryAreaError;

  async fn get(&self, key: &str) -> Result<Option<String>, MemoryAreaError> {
    let slots = self.slots.lock().map_err(|_| MemoryAreaError::Poisoned)?;
    Ok(slots.get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), MemoryAreaError> {
    let mut slots = self.slots.lock().map_err(|_| MemoryAreaError::Poisoned)?;

    if let Some(quota) = self.quota {
      let others: usize = slots
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
      let needed = others + key.len() + value.len();
      if needed > quota {
        return Err(MemoryAreaError::QuotaExceeded { needed, quota });
      }
    }

    slots.insert(key.to_owned(), value);
    Ok(())
  }
}
