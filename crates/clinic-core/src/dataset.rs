//! The whole persisted value: every appointment plus the user collection.

use serde::{Deserialize, Serialize};

use crate::{appointment::Appointment, lifecycle::AppointmentStats};

/// The single value stored under the store's key.
///
/// `users` is not interpreted here; it is carried verbatim so that writing
/// the dataset back never drops data another client put there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
  #[serde(default)]
  pub appointments: Vec<Appointment>,
  #[serde(default)]
  pub users:        Vec<serde_json::Value>,
}

impl Dataset {
  pub fn find(&self, id: &str) -> Option<&Appointment> {
    self.appointments.iter().find(|a| a.id == id)
  }

  pub fn find_mut(&mut self, id: &str) -> Option<&mut Appointment> {
    self.appointments.iter_mut().find(|a| a.id == id)
  }

  pub fn contains_id(&self, id: &str) -> bool { self.find(id).is_some() }

  pub fn stats(&self) -> AppointmentStats {
    AppointmentStats::from_appointments(&self.appointments)
  }
}
