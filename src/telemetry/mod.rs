//! Mock telemetry: synthetic hourly production, consumption, and battery
//! series for demonstration and seeding.

/// Naive battery charge carry-forward.
pub mod battery;
/// Household consumption draws.
pub mod consumption;
/// Clear-sky production curve.
pub mod curve;
pub mod generator;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub use battery::BatteryTracker;
pub use consumption::ConsumptionModel;
pub use generator::{GeneratorOptions, MockTelemetryGenerator, generate};

/// Generator input: the sizing subset of a persisted solar system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemProfile {
    /// Nameplate capacity; the generator substitutes its default when absent.
    #[serde(default)]
    pub capacity_kw: Option<f64>,
    /// `None` or zero disables the battery simulation.
    #[serde(default)]
    pub battery_capacity_kwh: Option<f64>,
}

impl SystemProfile {
    pub fn new(capacity_kw: f64, battery_capacity_kwh: Option<f64>) -> Self {
        Self {
            capacity_kw: Some(capacity_kw),
            battery_capacity_kwh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Clear,
}

impl WeatherCondition {
    /// Daylight hours are `sunny`, the rest `clear`.
    pub fn for_hour(hour: u32) -> Self {
        if curve::is_daylight(hour) {
            Self::Sunny
        } else {
            Self::Clear
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Clear => "clear",
        }
    }
}

/// One hourly reading. Values keep full precision; rounding happens when a
/// sample becomes a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
    /// `None` when the system has no battery.
    pub battery_percentage: Option<f64>,
    pub weather_condition: WeatherCondition,
}

impl TelemetrySample {
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Production minus consumption for this hour (negative = deficit).
    pub fn net_kwh(&self) -> f64 {
        self.production_kwh - self.consumption_kwh
    }
}

/// Order in which days are emitted. Hours always ascend within a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrder {
    /// Most recent day first (day offset 0, 1, 2, ...).
    #[default]
    DayDescending,
    /// Oldest day first; timestamps strictly increase.
    Chronological,
}
