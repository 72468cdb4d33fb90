//! System status report: latest reading, simulated efficiency, alerts.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::records::{EnergyProductionRecord, SolarSystem};

/// Efficiency below this raises a warning alert.
pub const EFFICIENCY_ALERT_THRESHOLD_PCT: u8 = 90;
const EFFICIENCY_FLOOR_PCT: f64 = 85.0;
const EFFICIENCY_SPAN_PCT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub system: SolarSystem,
    pub current_production: Option<EnergyProductionRecord>,
    pub status: OperationalStatus,
    /// Simulated efficiency in percent, `85..=99`.
    pub efficiency: u8,
    pub alerts: Vec<Alert>,
    pub last_updated: DateTime<Utc>,
}

/// Builds a status report for `system` from its stored rows.
///
/// The current reading is the row with the latest timestamp (the last one
/// wins on ties), regardless of the order rows were stored in.
pub fn summarize_status<'a, R: Rng + ?Sized>(
    system: &SolarSystem,
    rows: impl IntoIterator<Item = &'a EnergyProductionRecord>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SystemStatus {
    let current_production = rows
        .into_iter()
        .max_by_key(|row| row.timestamp)
        .cloned();

    let efficiency = (EFFICIENCY_FLOOR_PCT + rng.random::<f64>() * EFFICIENCY_SPAN_PCT).floor() as u8;

    let mut alerts = Vec::new();
    if efficiency < EFFICIENCY_ALERT_THRESHOLD_PCT {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            message: "System efficiency is below optimal levels".to_string(),
            timestamp: now,
        });
    }

    SystemStatus {
        system: system.clone(),
        current_production,
        status: OperationalStatus::Operational,
        efficiency,
        alerts,
        last_updated: now,
    }
}
