//! JSON REST API for the clinic appointment store.
//!
//! Exposes an axum [`Router`] backed by an [`AppointmentStore`] and a
//! [`SettingsStore`] over any [`StorageArea`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", clinic_api::api_router(store.clone(), settings.clone()))
//! ```

pub mod appointments;
pub mod booking;
pub mod error;
pub mod settings;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use clinic_core::{
  area::StorageArea, settings::SettingsStore, store::AppointmentStore,
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store` and `settings_store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<A>(
  store: Arc<AppointmentStore<A>>,
  settings_store: Arc<SettingsStore<A>>,
) -> Router<()>
where
  A: StorageArea + 'static,
{
  let settings_routes: Router<()> = Router::new()
    .route("/settings", get(settings::get_all::<A>))
    .route(
      "/settings/{category}",
      get(settings::get_category::<A>).put(settings::put_category::<A>),
    )
    .with_state(settings_store);

  Router::new()
    .route(
      "/appointments",
      get(appointments::list::<A>).post(appointments::create::<A>),
    )
    .route(
      "/appointments/{id}",
      get(appointments::get_one::<A>).delete(appointments::delete_one::<A>),
    )
    .route("/appointments/{id}/approve", post(appointments::approve::<A>))
    .route("/appointments/{id}/cancel", post(appointments::cancel::<A>))
    .route("/stats", get(stats::handler::<A>))
    .with_state(store)
    .merge(settings_routes)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{Days, Local};
  use clinic_core::{
    appointment::Appointment,
    area::MemoryArea,
    lifecycle::{AppointmentStats, AppointmentStatus},
    settings::default_settings,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn make_store() -> Arc<AppointmentStore<MemoryArea>> {
    Arc::new(AppointmentStore::new(MemoryArea::new()))
  }

  fn future_date() -> String {
    (Local::now().date_naive() + Days::new(30))
      .format("%Y-%m-%d")
      .to_string()
  }

  fn booking_json(patient_email: &str) -> Value {
    json!({
      "patientEmail":    patient_email,
      "fullName":        "Jane Doe",
      "phone":           "(555) 123-4567",
      "email":           patient_email,
      "dateOfBirth":     "1990-04-12",
      "gender":          "female",
      "appointmentDate": future_date(),
      "appointmentTime": "10:00",
      "department":      "General Medicine",
      "reason":          "Annual physical"
    })
  }

  async fn send_raw(
    store:        Arc<AppointmentStore<MemoryArea>>,
    method:       &str,
    uri:          &str,
    content_type: Option<&str>,
    body:         Body,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
      builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let settings = Arc::new(SettingsStore::new(store.area().clone()));
    let resp = api_router(store, settings)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn send(
    store:  Arc<AppointmentStore<MemoryArea>>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    match body {
      Some(v) => {
        let body = Body::from(v.to_string());
        send_raw(store, method, uri, Some("application/json"), body).await
      }
      None => send_raw(store, method, uri, None, Body::empty()).await,
    }
  }

  async fn book(store: &Arc<AppointmentStore<MemoryArea>>, email: &str) -> Appointment {
    let (status, body) =
      send(store.clone(), "POST", "/appointments", Some(booking_json(email))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    serde_json::from_value(body).unwrap()
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_pending_record() {
    let store = make_store();
    let created = book(&store, "a@b.com").await;

    assert_eq!(created.status, AppointmentStatus::Pending);
    assert_eq!(created.doctor_preference, "");
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(store.list_all().await.unwrap(), vec![created]);
  }

  #[tokio::test]
  async fn create_with_past_date_returns_400_and_stores_nothing() {
    let store = make_store();
    let mut body = booking_json("a@b.com");
    body["appointmentDate"] = json!("2000-01-01");

    let (status, resp) = send(store.clone(), "POST", "/appointments", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Appointment date cannot be in the past.");
    assert!(store.list_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_ignores_client_supplied_status() {
    let store = make_store();
    let mut body = booking_json("a@b.com");
    body["status"] = json!("approved");
    body["id"] = json!("chosen-by-client");

    let (status, resp) = send(store, "POST", "/appointments", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["status"], "pending");
    assert_ne!(resp["id"], "chosen-by-client");
  }

  #[tokio::test]
  async fn create_with_missing_field_reports_it_as_400() {
    let store = make_store();
    let mut body = booking_json("a@b.com");
    body.as_object_mut().unwrap().remove("reason");

    let (status, resp) = send(store.clone(), "POST", "/appointments", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "reason is required.");
    assert!(store.list_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_with_malformed_json_returns_400_json_error() {
    let store = make_store();
    let (status, resp) = send_raw(
      store.clone(),
      "POST",
      "/appointments",
      Some("application/json"),
      Body::from(r#"{"fullName": "Jane"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].is_string());
    assert_eq!(resp["retryable"], false);
    assert!(store.list_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_with_invalid_email_returns_400() {
    let mut body = booking_json("a@b.com");
    body["email"] = json!("jane at example");

    let (status, resp) = send(make_store(), "POST", "/appointments", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "email must be a valid email address.");
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_filters_by_patient_and_status() {
    let store = make_store();
    let a1 = book(&store, "a@b.com").await;
    book(&store, "x@y.com").await;
    let a2 = book(&store, "a@b.com").await;
    store
      .update_status(&a2.id, AppointmentStatus::Approved, "")
      .await
      .unwrap();

    let (_, all) = send(store.clone(), "GET", "/appointments", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, mine) =
      send(store.clone(), "GET", "/appointments?patient_email=a@b.com", None).await;
    let ids: Vec<_> = mine
      .as_array()
      .unwrap()
      .iter()
      .map(|a| a["id"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(ids, vec![a1.id.clone(), a2.id.clone()]);

    let (_, pending) =
      send(store.clone(), "GET", "/appointments?status=pending", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);

    let (_, mine_approved) = send(
      store,
      "GET",
      "/appointments?patient_email=a@b.com&status=approved",
      None,
    )
    .await;
    assert_eq!(mine_approved.as_array().unwrap().len(), 1);
    assert_eq!(mine_approved[0]["id"], a2.id);
  }

  #[tokio::test]
  async fn get_missing_returns_404() {
    let (status, body) = send(make_store(), "GET", "/appointments/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
  }

  // ── Decisions ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn approve_then_cancel_returns_409() {
    let store = make_store();
    let created = book(&store, "a@b.com").await;

    let (status, body) = send(
      store.clone(),
      "POST",
      &format!("/appointments/{}/approve", created.id),
      Some(json!({ "admin_notes": "Please arrive 10 minutes early" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["adminNotes"], "Please arrive 10 minutes early");

    let (status, body) = send(
      store.clone(),
      "POST",
      &format!("/appointments/{}/cancel", created.id),
      Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let stored = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Approved);
  }

  #[tokio::test]
  async fn approve_without_a_body_records_empty_notes() {
    let store = make_store();
    let created = book(&store, "a@b.com").await;

    let (status, body) = send(
      store.clone(),
      "POST",
      &format!("/appointments/{}/approve", created.id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "approved");
    assert_eq!(body["adminNotes"], "");
  }

  #[tokio::test]
  async fn cancel_with_malformed_body_returns_400_and_changes_nothing() {
    let store = make_store();
    let created = book(&store, "a@b.com").await;

    let (status, _) = send_raw(
      store.clone(),
      "POST",
      &format!("/appointments/{}/cancel", created.id),
      Some("application/json"),
      Body::from("not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Pending);
  }

  #[tokio::test]
  async fn cancel_missing_returns_404() {
    let (status, _) = send(
      make_store(),
      "POST",
      "/appointments/nope/cancel",
      Some(json!({ "admin_notes": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_existing_returns_204_then_404() {
    let store = make_store();
    let created = book(&store, "a@b.com").await;
    let uri = format!("/appointments/{}", created.id);

    let (status, _) = send(store.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(store.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.list_all().await.unwrap().is_empty());
  }

  // ── Stats ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stats_reflect_decisions() {
    let store = make_store();
    let a = book(&store, "a@b.com").await;
    let b = book(&store, "b@b.com").await;
    book(&store, "c@b.com").await;
    store.update_status(&a.id, AppointmentStatus::Approved, "").await.unwrap();
    store.update_status(&b.id, AppointmentStatus::Cancelled, "").await.unwrap();

    let (status, body) = send(store, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats: AppointmentStats = serde_json::from_value(body).unwrap();
    assert_eq!(stats, AppointmentStats {
      total:     3,
      pending:   1,
      approved:  1,
      cancelled: 1,
    });
  }

  // ── Settings ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn settings_default_until_saved() {
    let (status, body) = send(make_store(), "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(default_settings()).unwrap());
    assert_eq!(body["clinic-info"]["clinicName"], "DARSEHHA Clinic");
  }

  #[tokio::test]
  async fn put_settings_category_persists_it() {
    let store = make_store();
    let fields = json!({ "weekdayHours": "9:00 AM - 5:00 PM", "slotDuration": "20" });

    let (status, body) = send(
      store.clone(),
      "PUT",
      "/settings/appointment-settings",
      Some(fields.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["appointment-settings"], fields);
    assert_eq!(body["clinic-info"]["clinicName"], "DARSEHHA Clinic");

    let (status, body) =
      send(store, "GET", "/settings/appointment-settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, fields);
  }

  #[tokio::test]
  async fn put_settings_rejects_non_object_body() {
    let (status, body) = send(
      make_store(),
      "PUT",
      "/settings/clinic-info",
      Some(json!(["not", "an", "object"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn unknown_settings_category_returns_404() {
    let (status, _) = send(make_store(), "GET", "/settings/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Storage failures ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn storage_failure_returns_500_marked_retryable() {
    let store = Arc::new(AppointmentStore::new(MemoryArea::with_quota(64)));

    let (status, body) =
      send(store, "POST", "/appointments", Some(booking_json("a@b.com"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["retryable"], true);
  }
}
