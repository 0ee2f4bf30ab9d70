//! Handlers for `/appointments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/appointments` | Optional `?patient_email=` and `?status=` |
//! | `POST`   | `/appointments` | Body: [`NewAppointment`]; validated, returns 201 |
//! | `GET`    | `/appointments/{id}` | 404 if not found |
//! | `DELETE` | `/appointments/{id}` | 204, or 404 if not found |
//! | `POST`   | `/appointments/{id}/approve` | Optional body: `{"admin_notes":"..."}` |
//! | `POST`   | `/appointments/{id}/cancel` | Optional body: `{"admin_notes":"..."}` |
//!
//! Malformed JSON bodies are answered with 400 and the usual error body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Local;
use clinic_core::{
  appointment::{Appointment, NewAppointment},
  area::StorageArea,
  lifecycle::AppointmentStatus,
  store::AppointmentStore,
};
use serde::Deserialize;

use crate::{booking, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to one patient's bookings (exact match).
  pub patient_email: Option<String>,
  pub status:        Option<AppointmentStatus>,
}

/// `GET /appointments[?patient_email=...][&status=...]`
pub async fn list<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
  let mut appointments = match (&params.patient_email, params.status) {
    (Some(email), _) => store.list_by_patient(email).await?,
    (None, Some(status)) => store.list_by_status(status).await?,
    (None, None) => store.list_all().await?,
  };

  if let Some(status) = params.status {
    appointments.retain(|a| a.status == status);
  }

  Ok(Json(appointments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /appointments`. Returns 201 + the stored [`Appointment`].
pub async fn create<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  booking::validate(&body, Local::now().date_naive())?;
  let appointment = store.create_appointment(body).await?;
  Ok((StatusCode::CREATED, Json(appointment)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /appointments/{id}`
pub async fn get_one<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
  let appointment = store
    .get(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("appointment {id} not found")))?;
  Ok(Json(appointment))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /appointments/{id}`
pub async fn delete_one<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if store.delete_appointment(&id).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("appointment {id} not found")))
  }
}

// ─── Decisions ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DecisionBody {
  #[serde(default)]
  pub admin_notes: Option<String>,
}

async fn decide<A: StorageArea>(
  store: &AppointmentStore<A>,
  id: &str,
  status: AppointmentStatus,
  body: Result<Json<DecisionBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
  // No body at all means no notes.
  let body = match body {
    Ok(Json(body)) => body,
    Err(JsonRejection::MissingJsonContentType(_)) => DecisionBody::default(),
    Err(rejection) => return Err(rejection.into()),
  };
  let notes = body.admin_notes.unwrap_or_default();
  let appointment = store
    .update_status(id, status, notes)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("appointment {id} not found")))?;
  Ok(Json(appointment))
}

/// `POST /appointments/{id}/approve`
pub async fn approve<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  Path(id): Path<String>,
  body: Result<Json<DecisionBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
  decide(&store, &id, AppointmentStatus::Approved, body).await
}

/// `POST /appointments/{id}/cancel`
pub async fn cancel<A: StorageArea>(
  State(store): State<Arc<AppointmentStore<A>>>,
  Path(id): Path<String>,
  body: Result<Json<DecisionBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
  decide(&store, &id, AppointmentStatus::Cancelled, body).await
}
