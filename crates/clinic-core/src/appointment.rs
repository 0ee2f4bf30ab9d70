//! The appointment record, the unit of persisted data.
//!
//! Field names follow the persisted JSON layout (camelCase), so a dataset
//! written by any client of the same storage key reads back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::AppointmentStatus;

// ─── Appointment ─────────────────────────────────────────────────────────────

/// One booking request and its administrative disposition.
///
/// `id`, `status`, `created_at` and `updated_at` are assigned by the store;
/// callers never supply them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
  pub id:                String,
  /// The account that owns this booking; may differ from `email`.
  pub patient_email:     String,
  pub full_name:         String,
  pub phone:             String,
  pub email:             String,
  pub date_of_birth:     String,
  pub gender:            String,
  /// Requested day, `YYYY-MM-DD`.
  pub appointment_date:  String,
  /// Requested slot, `HH:MM`.
  pub appointment_time:  String,
  pub department:        String,
  pub doctor_preference: String,
  pub reason:            String,
  pub status:            AppointmentStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub admin_notes:       Option<String>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

// ─── NewAppointment ──────────────────────────────────────────────────────────

/// Input to [`crate::store::AppointmentStore::create_appointment`]: the
/// patient-supplied part of an [`Appointment`].
///
/// Missing fields decode as empty strings so the booking rules, not the
/// decoder, decide what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAppointment {
  pub patient_email:     String,
  pub full_name:         String,
  pub phone:             String,
  pub email:             String,
  pub date_of_birth:     String,
  pub gender:            String,
  pub appointment_date:  String,
  pub appointment_time:  String,
  pub department:        String,
  pub doctor_preference: String,
  pub reason:            String,
}

impl NewAppointment {
  /// Build the stored record. The status is always `Pending` and both
  /// timestamps are `at`.
  pub fn into_appointment(self, id: String, at: DateTime<Utc>) -> Appointment {
    Appointment {
      id,
      patient_email: self.patient_email,
      full_name: self.full_name,
      phone: self.phone,
      email: self.email,
      date_of_birth: self.date_of_birth,
      gender: self.gender,
      appointment_date: self.appointment_date,
      appointment_time: self.appointment_time,
      department: self.department,
      doctor_preference: self.doctor_preference,
      reason: self.reason,
      status: AppointmentStatus::Pending,
      admin_notes: None,
      created_at: at,
      updated_at: at,
    }
  }
}
