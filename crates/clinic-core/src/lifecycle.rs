//! Appointment status and the transitions an administrator may apply.
//!
//! Every appointment starts out `Pending`. An administrator decides it
//! exactly once, approving or cancelling it; both outcomes are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
  #[default]
  Pending,
  Approved,
  Cancelled,
}

impl AppointmentStatus {
  pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Cancelled];

  /// The lowercase name used in the persisted layout and over the API.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Cancelled => "cancelled",
    }
  }

  pub fn is_terminal(self) -> bool { !matches!(self, Self::Pending) }

  /// Only an undecided appointment may be decided, and only towards one of
  /// the two decisions.
  pub fn can_transition_to(self, next: Self) -> bool {
    matches!(
      (self, next),
      (Self::Pending, Self::Approved) | (Self::Pending, Self::Cancelled)
    )
  }
}

impl fmt::Display for AppointmentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Per-status counts over the whole appointment collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentStats {
  pub total:     usize,
  pub pending:   usize,
  pub approved:  usize,
  pub cancelled: usize,
}

impl AppointmentStats {
  pub fn from_appointments<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
  ) -> Self {
    appointments
      .into_iter()
      .fold(Self::default(), |mut stats, appointment| {
        stats.total += 1;
        match appointment.status {
          AppointmentStatus::Pending => stats.pending += 1,
          AppointmentStatus::Approved => stats.approved += 1,
          AppointmentStatus::Cancelled => stats.cancelled += 1,
        }
        stats
      })
  }

  pub fn count(&self, status: AppointmentStatus) -> usize {
    match status {
      AppointmentStatus::Pending => self.pending,
      AppointmentStatus::Approved => self.approved,
      AppointmentStatus::Cancelled => self.cancelled,
    }
  }
}
