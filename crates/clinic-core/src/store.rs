//! [`AppointmentStore`]: CRUD and aggregates over the persisted dataset.
//!
//! Every call reads the whole dataset from the storage area; every mutation
//! writes the whole dataset back. Within one process, mutations are
//! serialised by an async lock so concurrent handlers cannot interleave
//! their read-modify-write cycles. Writers in other processes sharing the
//! same area are not coordinated.

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  Error, Result,
  appointment::{Appointment, NewAppointment},
  area::StorageArea,
  dataset::Dataset,
  lifecycle::{AppointmentStats, AppointmentStatus},
};

/// The key the dataset lives under unless the store is built with another.
pub const DEFAULT_STORAGE_KEY: &str = "medicalClinicData";

/// Produce an id not already used in `taken`.
///
/// UUIDv7: a millisecond timestamp prefix followed by random bits, so ids
/// sort roughly by creation time.
pub fn generate_id(taken: &Dataset) -> String {
  loop {
    let id = Uuid::now_v7().hyphenated().to_string();
    if !taken.contains_id(&id) {
      return id;
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Owns the appointment collection stored under one key of a
/// [`StorageArea`].
///
/// Build one per process and share it by reference (or `Arc`).
pub struct AppointmentStore<A> {
  area:       A,
  key:        String,
  write_lock: Mutex<()>,
}

impl<A: StorageArea> AppointmentStore<A> {
  /// A store over `area` using [`DEFAULT_STORAGE_KEY`].
  pub fn new(area: A) -> Self { Self::with_key(area, DEFAULT_STORAGE_KEY) }

  pub fn with_key(area: A, key: impl Into<String>) -> Self {
    Self { area, key: key.into(), write_lock: Mutex::new(()) }
  }

  pub fn key(&self) -> &str { &self.key }

  pub fn area(&self) -> &A { &self.area }

  // ── Raw persistence ───────────────────────────────────────────────────────

  async fn read_raw(&self) -> Result<Option<String>> {
    self
      .area
      .get(&self.key)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))
  }

  async fn write(&self, dataset: &Dataset) -> Result<()> {
    let raw = serde_json::to_string(dataset)?;
    self
      .area
      .set(&self.key, raw)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))
  }

  /// Write an empty dataset if the slot has never been written. Calling it
  /// again is a no-op.
  pub async fn initialize(&self) -> Result<()> {
    let _guard = self.write_lock.lock().await;
    if self.read_raw().await?.is_none() {
      self.write(&Dataset::default()).await?;
      tracing::debug!(key = %self.key, "initialised empty dataset");
    }
    Ok(())
  }

  /// Read and decode the whole dataset.
  ///
  /// An empty slot or an undecodable value yields an empty dataset rather
  /// than an error; only a failure of the storage area itself is returned.
  /// Mutations do not go through here: see [`Self::load_for_write`].
  pub async fn load_all(&self) -> Result<Dataset> {
    match self.load_for_write().await {
      Err(Error::Serialization(e)) => {
        tracing::warn!(
          key = %self.key,
          error = %e,
          "stored dataset is not decodable; treating it as empty"
        );
        Ok(Dataset::default())
      }
      other => other,
    }
  }

  /// Strict read used before a write. An undecodable value is returned as
  /// [`Error::Serialization`] so it is never overwritten by a dataset that
  /// lost its records.
  async fn load_for_write(&self) -> Result<Dataset> {
    match self.read_raw().await? {
      Some(raw) => Ok(serde_json::from_str(&raw)?),
      None => Ok(Dataset::default()),
    }
  }

  /// Overwrite the stored value with `dataset`.
  pub async fn persist(&self, dataset: &Dataset) -> Result<()> {
    let _guard = self.write_lock.lock().await;
    self.write(dataset).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Append a new `Pending` appointment built from `input`.
  ///
  /// No validation happens here; callers check dates and required fields
  /// before calling.
  pub async fn create_appointment(
    &self,
    input: NewAppointment,
  ) -> Result<Appointment> {
    let _guard = self.write_lock.lock().await;
    let mut dataset = self.load_for_write().await?;

    let appointment = input.into_appointment(generate_id(&dataset), Utc::now());
    dataset.appointments.push(appointment.clone());
    self.write(&dataset).await?;

    tracing::info!(
      id = %appointment.id,
      department = %appointment.department,
      date = %appointment.appointment_date,
      "appointment created"
    );
    Ok(appointment)
  }

  /// Record an administrative decision on appointment `id`.
  ///
  /// Returns `Ok(None)` without writing if no appointment has that id, and
  /// [`Error::InvalidTransition`] without writing if the appointment has
  /// already been decided.
  pub async fn update_status(
    &self,
    id: &str,
    status: AppointmentStatus,
    notes: impl Into<String>,
  ) -> Result<Option<Appointment>> {
    let _guard = self.write_lock.lock().await;
    let mut dataset = self.load_for_write().await?;

    let Some(appointment) = dataset.find_mut(id) else {
      tracing::debug!(id, "status update skipped: no such appointment");
      return Ok(None);
    };

    if !appointment.status.can_transition_to(status) {
      return Err(Error::InvalidTransition {
        id:   id.to_owned(),
        from: appointment.status,
        to:   status,
      });
    }

    let from = appointment.status;
    appointment.status = status;
    appointment.admin_notes = Some(notes.into());
    // Never let the clock step `updated_at` backwards.
    appointment.updated_at = Utc::now().max(appointment.updated_at);
    let updated = appointment.clone();

    self.write(&dataset).await?;

    tracing::info!(id, %from, to = %status, "appointment status changed");
    Ok(Some(updated))
  }

  /// Remove appointment `id`. Returns whether anything was removed; when
  /// nothing matches, the stored value is left untouched.
  pub async fn delete_appointment(&self, id: &str) -> Result<bool> {
    let _guard = self.write_lock.lock().await;
    let mut dataset = self.load_for_write().await?;

    let before = dataset.appointments.len();
    dataset.appointments.retain(|a| a.id != id);
    if dataset.appointments.len() == before {
      return Ok(false);
    }

    self.write(&dataset).await?;
    tracing::info!(id, "appointment deleted");
    Ok(true)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Every appointment, in insertion order.
  pub async fn list_all(&self) -> Result<Vec<Appointment>> {
    Ok(self.load_all().await?.appointments)
  }

  /// Appointments owned by `patient_email` (exact, case-sensitive match), in
  /// insertion order.
  pub async fn list_by_patient(
    &self,
    patient_email: &str,
  ) -> Result<Vec<Appointment>> {
    let mut appointments = self.list_all().await?;
    appointments.retain(|a| a.patient_email == patient_email);
    Ok(appointments)
  }

  pub async fn list_by_status(
    &self,
    status: AppointmentStatus,
  ) -> Result<Vec<Appointment>> {
    let mut appointments = self.list_all().await?;
    appointments.retain(|a| a.status == status);
    Ok(appointments)
  }

  pub async fn get(&self, id: &str) -> Result<Option<Appointment>> {
    let dataset = self.load_all().await?;
    Ok(dataset.find(id).cloned())
  }

  pub async fn compute_stats(&self) -> Result<AppointmentStats> {
    Ok(self.load_all().await?.stats())
  }
}
