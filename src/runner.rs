//! Host-side workflows: the pure estimator and generator wired to a
//! profile source and a record sink.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{SolterraError, SolterraResult};
use crate::estimator::{EstimateRequest, EstimateResponse, Estimator, RoofTypePolicy};
use crate::records::{
    EnergyProductionRecord, MemorySink, ProfileSource, RecordSink, SavingsCalculation,
};
use crate::status::{SystemStatus, summarize_status};
use crate::telemetry::{MockTelemetryGenerator, TelemetrySample};

/// Result of seeding mock telemetry for one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockDataSummary {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

/// Estimator and generator configured from one [`AppConfig`].
#[derive(Debug, Clone)]
pub struct Runner {
    pub estimator: Estimator,
    pub generator: MockTelemetryGenerator,
    pub roof_type_policy: RoofTypePolicy,
    pub default_days: u32,
}

impl Runner {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            estimator: Estimator::new(config.estimator.constants()),
            generator: MockTelemetryGenerator::new(config.generator.options()),
            roof_type_policy: config.estimator.roof_type_policy,
            default_days: config.generator.default_days,
        }
    }

    /// Runs the savings calculator and, when the request names a user,
    /// stores the rounded result for them.
    pub fn calculate_savings(
        &self,
        request: &EstimateRequest,
        sink: &mut impl RecordSink,
    ) -> SolterraResult<EstimateResponse> {
        let input = request.to_input(self.roof_type_policy)?;
        let output = self.estimator.estimate(&input)?;
        if let Some(user_id) = request.user_id.as_deref().filter(|id| !id.is_empty()) {
            sink.store_savings(SavingsCalculation::new(user_id, &output))?;
        }
        Ok(EstimateResponse::from(&output))
    }

    /// Generates telemetry for a registered system, ending on the day of `now`.
    ///
    /// Requests above `generator.max_days` fail with `InvalidInput`.
    pub fn telemetry_for_system<R: Rng + ?Sized>(
        &self,
        source: &impl ProfileSource,
        system_id: &str,
        days: Option<u32>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SolterraResult<Vec<TelemetrySample>> {
        if system_id.is_empty() {
            return Err(SolterraError::invalid("system_id", "is required"));
        }
        let system = source.require_system(system_id)?;
        let days = days.unwrap_or(self.default_days);
        self.generator.generate(&system.profile(), days, now, rng)
    }

    /// Generates telemetry for a registered system and stores it.
    pub fn seed_mock_data<R: Rng + ?Sized>(
        &self,
        source: &impl ProfileSource,
        sink: &mut impl RecordSink,
        system_id: &str,
        days: Option<u32>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SolterraResult<MockDataSummary> {
        let samples = self.telemetry_for_system(source, system_id, days, now, rng)?;
        let rows: Vec<EnergyProductionRecord> = samples
            .iter()
            .map(|s| EnergyProductionRecord::from_sample(system_id, s))
            .collect();
        let count = rows.len();
        sink.store_production(rows)?;
        Ok(MockDataSummary {
            success: true,
            message: format!("Generated {count} data points for system {system_id}"),
            count,
        })
    }

    /// Status report for a registered system from the rows stored so far.
    pub fn system_status<R: Rng + ?Sized>(
        &self,
        source: &impl ProfileSource,
        history: &MemorySink,
        system_id: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SolterraResult<SystemStatus> {
        if system_id.is_empty() {
            return Err(SolterraError::invalid("system_id", "is required"));
        }
        let system = source.require_system(system_id)?;
        Ok(summarize_status(
            system,
            history.production_for(system_id),
            now,
            rng,
        ))
    }
}
