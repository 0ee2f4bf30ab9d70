//! Core types and the appointment store for the clinic booking system.
//!
//! The store owns one serialized dataset kept under a single key of a
//! [`StorageArea`](area::StorageArea); site settings sit under a second key
//! ([`SettingsStore`](settings::SettingsStore)). Backends (e.g.
//! `clinic-store-sqlite`) implement the area; everything above the stores
//! (`clinic-api`, `clinic-server`) talks to them, never to the area.

pub mod appointment;
pub mod area;
pub mod dataset;
pub mod error;
pub mod lifecycle;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
