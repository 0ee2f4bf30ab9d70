//! [`SettingsStore`]: the clinic's editable site settings.
//!
//! Settings are grouped into named categories (`clinic-info`,
//! `website-content`, ...), each a flat JSON object. The whole collection is
//! one JSON value kept under its own key of a [`StorageArea`], next to the
//! appointment dataset.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{Error, Result, area::StorageArea};

/// The key settings live under unless the store is built with another.
pub const DEFAULT_SETTINGS_KEY: &str = "clinicSettings";

/// One settings category: field name to value.
pub type Category = Map<String, Value>;

/// Every category, by name.
pub type Settings = BTreeMap<String, Category>;

fn category(fields: &[(&str, &str)]) -> Category {
  fields
    .iter()
    .map(|(k, v)| ((*k).to_owned(), Value::from(*v)))
    .collect()
}

/// The settings a clinic starts with before anything has been saved.
pub fn default_settings() -> Settings {
  BTreeMap::from([
    ("clinic-info".to_owned(), category(&[
      ("clinicName", "DARSEHHA Clinic"),
      ("clinicPhone", "(555) 123-4567"),
      ("clinicEmail", "info@darsehha.com"),
      ("emergencyPhone", "(555) 911-HELP"),
      ("clinicAddress", "123 Health Street, Medical City"),
      (
        "clinicDescription",
        "Providing quality healthcare services with compassion and excellence.",
      ),
    ])),
    ("website-content".to_owned(), category(&[
      ("heroTitle", "Your Health, Our Priority"),
      (
        "heroSubtitle",
        "Experience exceptional healthcare with our team of dedicated \
         professionals. Book your appointment today and take the first step \
         towards better health.",
      ),
      ("totalPatients", "15K+"),
      ("totalDoctors", "50+"),
      ("yearsExperience", "25"),
      ("emergencyAvailability", "24/7"),
    ])),
    ("appointment-settings".to_owned(), category(&[
      ("weekdayHours", "8:00 AM - 8:00 PM"),
      ("saturdayHours", "9:00 AM - 6:00 PM"),
      ("sundayHours", "10:00 AM - 4:00 PM"),
      ("slotDuration", "30"),
      ("maxAdvanceBooking", "30"),
      ("minAdvanceBooking", "2"),
    ])),
    ("system-settings".to_owned(), category(&[
      ("maintenanceMode", "off"),
      ("autoApproval", "off"),
      ("emailNotifications", "on"),
      ("dataRetention", "365"),
    ])),
  ])
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Owns the settings collection stored under one key of a [`StorageArea`].
pub struct SettingsStore<A> {
  area:       A,
  key:        String,
  write_lock: Mutex<()>,
}

impl<A: StorageArea> SettingsStore<A> {
  /// A store over `area` using [`DEFAULT_SETTINGS_KEY`].
  pub fn new(area: A) -> Self { Self::with_key(area, DEFAULT_SETTINGS_KEY) }

  pub fn with_key(area: A, key: impl Into<String>) -> Self {
    Self { area, key: key.into(), write_lock: Mutex::new(()) }
  }

  pub fn key(&self) -> &str { &self.key }

  async fn read(&self) -> Result<Option<Settings>> {
    let raw = self
      .area
      .get(&self.key)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))?;
    Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
  }

  /// The saved settings, or [`default_settings`] if nothing has been saved.
  ///
  /// An undecodable value also yields the defaults, with a warning.
  pub async fn load(&self) -> Result<Settings> {
    match self.read().await {
      Ok(settings) => Ok(settings.unwrap_or_else(default_settings)),
      Err(Error::Serialization(e)) => {
        tracing::warn!(
          key = %self.key,
          error = %e,
          "stored settings are not decodable; using defaults"
        );
        Ok(default_settings())
      }
      Err(e) => Err(e),
    }
  }

  /// One category of [`Self::load`], if it exists.
  pub async fn category(&self, name: &str) -> Result<Option<Category>> {
    Ok(self.load().await?.remove(name))
  }

  /// Replace category `name` with `fields` and return the full settings.
  ///
  /// The first save starts from [`default_settings`], so categories nobody
  /// has edited keep their defaults. An undecodable stored value is an
  /// [`Error::Serialization`] and is left in place.
  pub async fn save_category(
    &self,
    name: &str,
    fields: Category,
  ) -> Result<Settings> {
    let _guard = self.write_lock.lock().await;
    let mut settings = self.read().await?.unwrap_or_else(default_settings);

    settings.insert(name.to_owned(), fields);
    let raw = serde_json::to_string(&settings)?;
    self
      .area
      .set(&self.key, raw)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))?;

    tracing::info!(key = %self.key, category = name, "settings saved");
    Ok(settings)
  }
}
