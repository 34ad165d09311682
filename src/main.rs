//! Vitalpoll: Health-risk monitor over a remote telemetry feed.
//!
//! Main entry point: composition root plus a thin console presenter.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitalpoll::adapters::{FeedConfig, ModelArtifact, ThingSpeakClient};
use vitalpoll::application::{MonitorService, MonitorUpdate, RefreshWorker, DEFAULT_REFRESH_INTERVAL};
use vitalpoll::domain::{Gender, PersonalProfile};

const MODEL_PATH_ENV: &str = "VITALPOLL_MODEL_PATH";
const DEFAULT_MODEL_PATH: &str = "models/artifact.json";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vitalpoll...");

    // Artifact loading is fatal at startup: without the trained scaler and
    // classifier there is nothing meaningful to serve.
    let model_path = std::env::var(MODEL_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));
    let model = ModelArtifact::load(&model_path)
        .with_context(|| format!("loading model artifact from {}", model_path.display()))?;
    tracing::info!(path = %model_path.display(), "Model artifact loaded");

    let config = FeedConfig::from_env();
    tracing::info!(channel = %config.channel_id, "Polling telemetry channel");
    let feed = ThingSpeakClient::new(&config);

    // The profile stands in for the presentation shell's input form; it is
    // re-read every cycle and may be edited between cycles.
    let profile = Arc::new(Mutex::new(profile_from_env()?));

    let service = MonitorService::new(feed, model);
    let handle = RefreshWorker::spawn(service, Arc::clone(&profile), DEFAULT_REFRESH_INTERVAL);

    // Console presenter: consumes updates until the process is terminated.
    for update in handle.updates.iter() {
        match update {
            MonitorUpdate::Report(report) => {
                println!(
                    "[{}] HR {:.1} bpm | SpO2 {:.1} % | Temp {:.1} °C => {}",
                    report.local_time,
                    report.reading.heart_rate,
                    report.reading.o2_saturation,
                    report.reading.body_temperature,
                    report.verdict,
                );
            }
            MonitorUpdate::NoData => {
                println!("Unable to retrieve valid sensor data yet.");
            }
            MonitorUpdate::InferenceFailed(reason) => {
                println!("Risk classification unavailable this cycle: {reason}");
            }
        }
    }

    Ok(())
}

/// Read the personal profile from the environment, with the defaults the
/// input form would preselect.
fn profile_from_env() -> Result<PersonalProfile> {
    let age = env_parsed("VITALPOLL_AGE").unwrap_or(25);
    let gender = match std::env::var("VITALPOLL_GENDER").ok().as_deref() {
        Some(g) if g.eq_ignore_ascii_case("female") => Gender::Female,
        _ => Gender::Male,
    };
    let weight_kg = env_parsed("VITALPOLL_WEIGHT_KG").unwrap_or(60.0);
    let height_cm = env_parsed("VITALPOLL_HEIGHT_CM").unwrap_or(170.0);

    PersonalProfile::new(age, gender, weight_kg, height_cm)
        .map_err(|errors| anyhow::anyhow!("invalid profile: {}", errors.join("; ")))
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}
