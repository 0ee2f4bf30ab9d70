//! Checks applied to a booking before it reaches the store.
//!
//! The store accepts anything; these are the rules the booking form
//! enforces. Messages are shown to the patient verbatim.

use chrono::{NaiveDate, NaiveTime};
use clinic_core::appointment::NewAppointment;

use crate::error::ApiError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Validate `input` as of calendar day `today`.
pub fn validate(input: &NewAppointment, today: NaiveDate) -> Result<(), ApiError> {
  let required = [
    ("patientEmail", &input.patient_email),
    ("fullName", &input.full_name),
    ("phone", &input.phone),
    ("email", &input.email),
    ("dateOfBirth", &input.date_of_birth),
    ("gender", &input.gender),
    ("appointmentDate", &input.appointment_date),
    ("appointmentTime", &input.appointment_time),
    ("department", &input.department),
    ("reason", &input.reason),
  ];
  if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
    return Err(ApiError::BadRequest(format!("{field} is required.")));
  }

  let emails = [("patientEmail", &input.patient_email), ("email", &input.email)];
  for (field, value) in emails {
    if !is_email(value.trim()) {
      return Err(ApiError::BadRequest(format!(
        "{field} must be a valid email address."
      )));
    }
  }

  let bad_format =
    || ApiError::BadRequest("Please check your date and time formats.".into());

  let date = NaiveDate::parse_from_str(input.appointment_date.trim(), DATE_FORMAT)
    .map_err(|_| bad_format())?;
  if date < today {
    return Err(ApiError::BadRequest(
      "Appointment date cannot be in the past.".into(),
    ));
  }

  NaiveTime::parse_from_str(input.appointment_time.trim(), TIME_FORMAT)
    .map_err(|_| bad_format())?;

  let born = NaiveDate::parse_from_str(input.date_of_birth.trim(), DATE_FORMAT)
    .map_err(|_| bad_format())?;
  if born > today {
    return Err(ApiError::BadRequest(
      "Date of birth cannot be in the future.".into(),
    ));
  }

  Ok(())
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with text on both sides.
fn is_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') || s.contains(char::is_whitespace) {
    return false;
  }
  domain
    .char_indices()
    .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
