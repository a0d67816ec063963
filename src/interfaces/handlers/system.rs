use std::time::Duration;

use actix_web::{get, web, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{
    constants::START_TIME,
    envelope::Envelope,
    utils::timestamp,
    AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime: String,
    pub timestamp: String,
    pub started_at: String,
    pub version: &'static str,
    pub database: &'static str,
    pub sessions: &'static str,
}

fn reachability<E: std::fmt::Display>(component: &str, result: Result<(), E>) -> &'static str {
    match result {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!(component, "Health probe failed: {}", e);
            "Unavailable"
        }
    }
}

async fn build_health_report(state: &AppState) -> HealthReport {
    let now = Utc::now();
    let uptime_secs = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let database = reachability("database", state.store.ping().await);
    let sessions = reachability("sessions", state.sessions.ping().await);
    let status = if database == "OK" && sessions == "OK" { "healthy" } else { "degraded" };

    HealthReport {
        status,
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: timestamp::format(&now),
        started_at: timestamp::format(&START_TIME),
        version: env!("CARGO_PKG_VERSION"),
        database,
        sessions,
    }
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    Envelope::success(build_health_report(&state).await).with_status(actix_web::http::StatusCode::OK)
}
