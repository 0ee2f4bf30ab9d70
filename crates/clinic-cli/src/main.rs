//! `clinic`: command-line client for the clinic appointment API.
//!
//! # Usage
//!
//! ```
//! clinic --url http://localhost:5000 list --status pending
//! clinic approve <id> --notes "Please bring your referral"
//! clinic --config ~/.config/clinic/config.toml stats
//! clinic set-settings clinic-info clinic-info.json
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use clinic_core::{
  appointment::NewAppointment, lifecycle::AppointmentStatus, settings::Category,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "clinic", about = "Manage clinic appointments from the terminal")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the clinic server (default: http://localhost:5000).
  #[arg(long, env = "CLINIC_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List appointments, optionally for one patient or in one status.
  List {
    /// Only appointments owned by this account email.
    #[arg(long)]
    patient: Option<String>,
    /// pending, approved or cancelled.
    #[arg(long, value_parser = parse_status)]
    status:  Option<AppointmentStatus>,
  },
  /// Show one appointment in full.
  Show { id: String },
  /// Book an appointment from a JSON file of patient fields.
  Book { file: PathBuf },
  /// Approve a pending appointment.
  Approve {
    id:    String,
    #[arg(long)]
    notes: Option<String>,
  },
  /// Cancel a pending appointment.
  Cancel {
    id:    String,
    #[arg(long)]
    notes: Option<String>,
  },
  /// Delete an appointment permanently.
  Delete { id: String },
  /// Print appointment counts per status.
  Stats,
  /// Show the site settings, or one category of them.
  Settings { category: Option<String> },
  /// Replace one settings category with the JSON object in a file.
  SetSettings { category: String, file: PathBuf },
}

fn parse_status(s: &str) -> Result<AppointmentStatus, String> {
  serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
    .map_err(|_| format!("unknown status {s:?}; expected pending, approved or cancelled"))
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:5000".to_string()),
  };
  tracing::debug!(base_url = %api_config.base_url, "using clinic server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List { patient, status } => {
      let appointments = client.list(patient.as_deref(), status).await?;
      print!("{}", render::table(&appointments));
    }
    Command::Show { id } => {
      let appointment = client.get(&id).await?;
      print!("{}", render::detail(&appointment));
    }
    Command::Book { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading booking file {}", file.display()))?;
      let input: NewAppointment =
        serde_json::from_str(&raw).context("parsing booking file")?;
      let appointment = client.book(&input).await?;
      println!("Booked {} ({})", appointment.id, appointment.status);
    }
    Command::Approve { id, notes } => {
      let appointment = client
        .decide(&id, AppointmentStatus::Approved, notes.as_deref())
        .await?;
      println!("Appointment {} is now {}", appointment.id, appointment.status);
    }
    Command::Cancel { id, notes } => {
      let appointment = client
        .decide(&id, AppointmentStatus::Cancelled, notes.as_deref())
        .await?;
      println!("Appointment {} is now {}", appointment.id, appointment.status);
    }
    Command::Delete { id } => {
      client.delete(&id).await?;
      println!("Deleted {id}");
    }
    Command::Stats => {
      let stats = client.stats().await?;
      print!("{}", render::stats(&stats));
    }
    Command::Settings { category } => {
      let settings = client.settings().await?;
      match category {
        Some(name) => {
          let fields = settings
            .get(&name)
            .ok_or_else(|| anyhow!("no settings category named {name:?}"))?;
          print!("{}", render::category(&name, fields));
        }
        None => {
          for (name, fields) in &settings {
            print!("{}", render::category(name, fields));
          }
        }
      }
    }
    Command::SetSettings { category, file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading settings file {}", file.display()))?;
      let fields: Category =
        serde_json::from_str(&raw).context("settings file must hold a JSON object")?;
      client.save_settings(&category, &fields).await?;
      println!("Saved settings category {category}");
    }
  }
  Ok(())
}
