//! Error types for `clinic-core`.

use thiserror::Error;

use crate::lifecycle::AppointmentStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("appointment {id} cannot move from {from} to {to}")]
  InvalidTransition {
    id:   String,
    from: AppointmentStatus,
    to:   AppointmentStatus,
  },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether repeating the same call may succeed. Storage failures (quota,
  /// I/O) are transient from the caller's point of view; the rest are not.
  pub fn is_retryable(&self) -> bool { matches!(self, Self::Storage(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
