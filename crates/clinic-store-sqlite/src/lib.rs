//! SQLite backend for the clinic storage area.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime.

mod area;
mod schema;

pub mod error;

pub use area::SqliteArea;
pub use error::{Error, Result};
