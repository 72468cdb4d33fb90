//! Stored-record shapes and the seams to the external data store.
//!
//! The store itself lives outside this crate. Hosts fetch system records
//! through [`ProfileSource`] and hand finished rows to a [`RecordSink`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SolterraError, SolterraResult};
use crate::estimator::{EstimatorOutput, round_to};
use crate::telemetry::{SystemProfile, TelemetrySample, WeatherCondition};

/// A registered solar installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarSystem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capacity_kw: Option<f64>,
    #[serde(default)]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(default)]
    pub panels_count: Option<u32>,
    #[serde(default)]
    pub inverter_model: Option<String>,
}

impl SolarSystem {
    pub fn profile(&self) -> SystemProfile {
        SystemProfile {
            capacity_kw: self.capacity_kw,
            battery_capacity_kwh: self.battery_capacity_kwh,
        }
    }
}

/// One stored hourly production row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProductionRecord {
    pub system_id: String,
    pub timestamp: DateTime<Utc>,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
    pub battery_percentage: Option<f64>,
    pub weather_condition: WeatherCondition,
}

impl EnergyProductionRecord {
    /// Builds the stored row, rounding energy to 2 dp and charge to 1 dp.
    pub fn from_sample(system_id: &str, sample: &TelemetrySample) -> Self {
        Self {
            system_id: system_id.to_string(),
            timestamp: sample.timestamp,
            production_kwh: round_to(sample.production_kwh, 2),
            consumption_kwh: round_to(sample.consumption_kwh, 2),
            battery_percentage: sample.battery_percentage.map(|pct| round_to(pct, 1)),
            weather_condition: sample.weather_condition,
        }
    }
}

/// One stored savings calculation for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsCalculation {
    pub user_id: String,
    pub system_size_kw: f64,
    pub estimated_production_kwh_year: f64,
    pub estimated_savings_year: f64,
    pub co2_reduction_tons_year: f64,
    pub installation_cost: f64,
    /// `None` when the system never pays back.
    pub payback_period_years: Option<f64>,
}

impl SavingsCalculation {
    pub fn new(user_id: &str, output: &EstimatorOutput) -> Self {
        let r = output.rounded();
        Self {
            user_id: user_id.to_string(),
            system_size_kw: r.system_size_kw,
            estimated_production_kwh_year: r.annual_production_kwh,
            estimated_savings_year: r.annual_savings,
            co2_reduction_tons_year: r.co2_reduction_tons_per_year,
            installation_cost: r.installation_cost,
            payback_period_years: r.payback_years(),
        }
    }
}

/// Looks up system records by id.
pub trait ProfileSource {
    fn system(&self, id: &str) -> Option<&SolarSystem>;

    /// Like [`ProfileSource::system`] but maps a miss to
    /// [`SolterraError::NotFound`].
    fn require_system(&self, id: &str) -> SolterraResult<&SolarSystem> {
        self.system(id)
            .ok_or_else(|| SolterraError::NotFound(format!("solar system `{id}`")))
    }
}

/// Accepts finished rows for persistence.
pub trait RecordSink {
    fn store_production(&mut self, rows: Vec<EnergyProductionRecord>) -> SolterraResult<()>;

    fn store_savings(&mut self, calculation: SavingsCalculation) -> SolterraResult<()>;
}

/// In-memory system registry, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SystemRegistry {
    systems: BTreeMap<String, SolarSystem>,
}

impl SystemRegistry {
    pub fn new(systems: impl IntoIterator<Item = SolarSystem>) -> Self {
        Self {
            systems: systems.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl ProfileSource for SystemRegistry {
    fn system(&self, id: &str) -> Option<&SolarSystem> {
        self.systems.get(id)
    }
}

/// Sink that keeps everything in memory, used by the HTTP service and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub production: Vec<EnergyProductionRecord>,
    pub savings: Vec<SavingsCalculation>,
}

impl MemorySink {
    /// Rows stored for `system_id`, in insertion order.
    pub fn production_for<'a>(
        &'a self,
        system_id: &'a str,
    ) -> impl Iterator<Item = &'a EnergyProductionRecord> + 'a {
        self.production
            .iter()
            .filter(move |row| row.system_id == system_id)
    }
}

impl RecordSink for MemorySink {
    fn store_production(&mut self, rows: Vec<EnergyProductionRecord>) -> SolterraResult<()> {
        self.production.extend(rows);
        Ok(())
    }

    fn store_savings(&mut self, calculation: SavingsCalculation) -> SolterraResult<()> {
        self.savings.push(calculation);
        Ok(())
    }
}
