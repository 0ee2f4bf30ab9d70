//! Async HTTP client wrapping the clinic JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clinic_core::{
  appointment::{Appointment, NewAppointment},
  lifecycle::{AppointmentStats, AppointmentStatus},
  settings::{Category, Settings},
};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

/// Connection settings for the clinic API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the clinic JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Error body returned by the API.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Turn a non-success response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  /// `GET /api/appointments[?patient_email=..][&status=..]`
  pub async fn list(
    &self,
    patient_email: Option<&str>,
    status: Option<AppointmentStatus>,
  ) -> Result<Vec<Appointment>> {
    let mut query = Vec::new();
    if let Some(email) = patient_email {
      query.push(("patient_email", email.to_owned()));
    }
    if let Some(status) = status {
      query.push(("status", status.as_str().to_owned()));
    }

    let resp = self
      .client
      .get(self.url("/appointments"))
      .query(&query)
      .send()
      .await
      .context("GET /appointments failed")?;
    Self::check(resp, "GET /appointments")
      .await?
      .json()
      .await
      .context("deserialising appointments")
  }

  /// `GET /api/appointments/{id}`
  pub async fn get(&self, id: &str) -> Result<Appointment> {
    let resp = self
      .client
      .get(self.url(&format!("/appointments/{id}")))
      .send()
      .await
      .context("GET /appointments/{id} failed")?;
    Self::check(resp, "GET /appointments/{id}")
      .await?
      .json()
      .await
      .context("deserialising appointment")
  }

  /// `POST /api/appointments`
  pub async fn book(&self, input: &NewAppointment) -> Result<Appointment> {
    let resp = self
      .client
      .post(self.url("/appointments"))
      .json(input)
      .send()
      .await
      .context("POST /appointments failed")?;
    Self::check(resp, "POST /appointments")
      .await?
      .json()
      .await
      .context("deserialising created appointment")
  }

  /// `POST /api/appointments/{id}/approve` or `/cancel`
  pub async fn decide(
    &self,
    id: &str,
    status: AppointmentStatus,
    notes: Option<&str>,
  ) -> Result<Appointment> {
    let action = match status {
      AppointmentStatus::Approved => "approve",
      AppointmentStatus::Cancelled => "cancel",
      AppointmentStatus::Pending => {
        return Err(anyhow!("an appointment cannot be returned to pending"));
      }
    };
    let path = format!("/appointments/{id}/{action}");

    let resp = self
      .client
      .post(self.url(&path))
      .json(&json!({ "admin_notes": notes }))
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    Self::check(resp, &format!("POST {path}"))
      .await?
      .json()
      .await
      .context("deserialising updated appointment")
  }

  /// `DELETE /api/appointments/{id}`
  pub async fn delete(&self, id: &str) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/appointments/{id}")))
      .send()
      .await
      .context("DELETE /appointments/{id} failed")?;
    Self::check(resp, "DELETE /appointments/{id}").await?;
    Ok(())
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<AppointmentStats> {
    let resp = self
      .client
      .get(self.url("/stats"))
      .send()
      .await
      .context("GET /stats failed")?;
    Self::check(resp, "GET /stats")
      .await?
      .json()
      .await
      .context("deserialising stats")
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  /// `GET /api/settings`
  pub async fn settings(&self) -> Result<Settings> {
    let resp = self
      .client
      .get(self.url("/settings"))
      .send()
      .await
      .context("GET /settings failed")?;
    Self::check(resp, "GET /settings")
      .await?
      .json()
      .await
      .context("deserialising settings")
  }

  /// `PUT /api/settings/{category}`
  pub async fn save_settings(
    &self,
    category: &str,
    fields: &Category,
  ) -> Result<Settings> {
    let path = format!("/settings/{category}");
    let resp = self
      .client
      .put(self.url(&path))
      .json(fields)
      .send()
      .await
      .with_context(|| format!("PUT {path} failed"))?;
    Self::check(resp, &format!("PUT {path}"))
      .await?
      .json()
      .await
      .context("deserialising saved settings")
  }
}
