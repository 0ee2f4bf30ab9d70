//! Plain-text rendering of appointments and settings for the terminal.

use std::fmt::Write as _;

use clinic_core::{
  appointment::Appointment,
  lifecycle::{AppointmentStats, AppointmentStatus},
  settings::Category,
};
use serde_json::Value;

/// One line per appointment, aligned in columns.
pub fn table(appointments: &[Appointment]) -> String {
  if appointments.is_empty() {
    return "No appointments found.\n".to_string();
  }

  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<36}  {:<10}  {:<5}  {:<18}  {:<20}  {}",
    "ID", "DATE", "TIME", "DEPARTMENT", "PATIENT", "STATUS"
  );
  for a in appointments {
    let _ = writeln!(
      out,
      "{:<36}  {:<10}  {:<5}  {:<18}  {:<20}  {}",
      a.id,
      a.appointment_date,
      a.appointment_time,
      truncate(&a.department, 18),
      truncate(&a.full_name, 20),
      a.status
    );
  }
  out
}

/// Every field of one appointment, including the decision if there is one.
pub fn detail(a: &Appointment) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Appointment {}", a.id);
  let _ = writeln!(out, "  Status:      {}", a.status);
  let _ = writeln!(out, "  When:        {} {}", a.appointment_date, a.appointment_time);
  let _ = writeln!(out, "  Department:  {}", a.department);
  if !a.doctor_preference.is_empty() {
    let _ = writeln!(out, "  Doctor:      {}", a.doctor_preference);
  }
  let _ = writeln!(out, "  Patient:     {} <{}>", a.full_name, a.email);
  let _ = writeln!(out, "  Account:     {}", a.patient_email);
  let _ = writeln!(out, "  Phone:       {}", a.phone);
  let _ = writeln!(out, "  Born:        {} ({})", a.date_of_birth, a.gender);
  let _ = writeln!(out, "  Reason:      {}", a.reason);
  if a.status != AppointmentStatus::Pending {
    let notes = a.admin_notes.as_deref().filter(|n| !n.is_empty()).unwrap_or("-");
    let _ = writeln!(out, "  Notes:       {notes}");
  }
  let _ = writeln!(out, "  Created:     {}", a.created_at.to_rfc3339());
  let _ = writeln!(out, "  Updated:     {}", a.updated_at.to_rfc3339());
  out
}

pub fn stats(s: &AppointmentStats) -> String {
  format!(
    "total: {}  pending: {}  approved: {}  cancelled: {}\n",
    s.total, s.pending, s.approved, s.cancelled
  )
}

/// A settings category as `key: value` lines under its name. String values
/// print bare; anything else prints as JSON.
pub fn category(name: &str, fields: &Category) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "[{name}]");
  for (key, value) in fields {
    match value {
      Value::String(s) => {
        let _ = writeln!(out, "  {key}: {s}");
      }
      other => {
        let _ = writeln!(out, "  {key}: {other}");
      }
    }
  }
  out
}

fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    s.to_string()
  } else {
    let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
    t.push('…');
    t
  }
}
