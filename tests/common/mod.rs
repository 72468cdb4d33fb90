//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use solterra::estimator::{EstimatorInput, RoofType};
use solterra::telemetry::SystemProfile;

/// Reference household: 500 sq ft flat roof, 5 sun hours, tariff 2.5.
pub fn reference_input() -> EstimatorInput {
    EstimatorInput {
        roof_area_sq_ft: 500.0,
        monthly_bill: 2500.0,
        sunlight_hours_per_day: 5.0,
        roof_type: RoofType::Flat,
        electricity_rate_per_kwh: 2.5,
    }
}

/// Fixed generation anchor (mid-afternoon so hour truncation is visible).
pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 14, 37, 12).unwrap()
}

/// Seeded RNG (seed 42).
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// 10 kW system without a battery.
pub fn panels_only() -> SystemProfile {
    SystemProfile::new(10.0, None)
}

/// 10 kW system with a 13.5 kWh battery.
pub fn with_battery() -> SystemProfile {
    SystemProfile::new(10.0, Some(13.5))
}
