//! Solar economics estimator: roof and tariff inputs to sizing, cost,
//! savings, and environmental-impact figures.
//!
//! All arithmetic runs at full precision. Cosmetic rounding happens only
//! in [`EstimatorOutput::rounded`], which hosts call at the output boundary.

mod request;
mod roof;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SolterraError, SolterraResult, require_non_negative, require_positive};

pub use request::{EstimateRequest, EstimateResponse};
pub use roof::{RoofType, RoofTypePolicy};

/// Default installation cost per installed kW, in local currency units.
pub const INSTALLATION_COST_PER_KW: f64 = 45_000.0;
/// Tonnes of CO2 avoided per kWh produced (0.7 kg/kWh).
pub const CO2_TONS_PER_KWH: f64 = 0.0007;
/// Tree-equivalent factor applied to tonnes of CO2 per year.
pub const TREES_PER_TON_CO2: f64 = 0.04;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Overridable coefficients used by [`Estimator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConstants {
    pub installation_cost_per_kw: f64,
    pub co2_tons_per_kwh: f64,
    pub trees_per_ton_co2: f64,
}

impl Default for EstimatorConstants {
    fn default() -> Self {
        Self {
            installation_cost_per_kw: INSTALLATION_COST_PER_KW,
            co2_tons_per_kwh: CO2_TONS_PER_KWH,
            trees_per_ton_co2: TREES_PER_TON_CO2,
        }
    }
}

/// Validated estimator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorInput {
    /// Usable roof area in square feet (> 0).
    pub roof_area_sq_ft: f64,
    /// Current monthly electricity bill (> 0). Informational only.
    pub monthly_bill: f64,
    /// Average peak sunlight hours per day (> 0).
    pub sunlight_hours_per_day: f64,
    pub roof_type: RoofType,
    /// Tariff per kWh (>= 0; zero yields an infinite payback).
    pub electricity_rate_per_kwh: f64,
}

impl EstimatorInput {
    /// Checks every numeric precondition, returning the first violation.
    pub fn validate(&self) -> SolterraResult<()> {
        require_positive("roof_area_sq_ft", self.roof_area_sq_ft)?;
        require_positive("monthly_bill", self.monthly_bill)?;
        require_positive("sunlight_hours_per_day", self.sunlight_hours_per_day)?;
        require_non_negative("electricity_rate_per_kwh", self.electricity_rate_per_kwh)?;
        Ok(())
    }
}

/// Sizing, financial, and environmental projections for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatorOutput {
    pub system_size_kw: f64,
    pub installation_cost: f64,
    pub annual_production_kwh: f64,
    pub annual_savings: f64,
    /// `installation_cost / annual_savings`; `f64::INFINITY` when there are
    /// no savings.
    pub payback_period_years: f64,
    pub co2_reduction_tons_per_year: f64,
    pub trees_equivalent: u64,
}

impl EstimatorOutput {
    /// False when annual savings are zero and the system never pays back.
    pub fn pays_back(&self) -> bool {
        self.payback_period_years.is_finite()
    }

    /// Payback period, or `None` when it is infinite.
    pub fn payback_years(&self) -> Option<f64> {
        self.pays_back().then_some(self.payback_period_years)
    }

    /// Applies display rounding: 2 dp for currency, kWh, and CO2; 1 dp for
    /// the payback period. Tree count is already whole.
    pub fn rounded(&self) -> Self {
        Self {
            system_size_kw: round_to(self.system_size_kw, 2),
            installation_cost: round_to(self.installation_cost, 2),
            annual_production_kwh: round_to(self.annual_production_kwh, 2),
            annual_savings: round_to(self.annual_savings, 2),
            payback_period_years: round_to(self.payback_period_years, 1),
            co2_reduction_tons_per_year: round_to(self.co2_reduction_tons_per_year, 2),
            trees_equivalent: self.trees_equivalent,
        }
    }
}

impl fmt::Display for EstimatorOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Solar Estimate ---")?;
        writeln!(f, "System size:           {:.2} kW", self.system_size_kw)?;
        writeln!(f, "Installation cost:     {:.2}", self.installation_cost)?;
        writeln!(f, "Annual production:     {:.2} kWh", self.annual_production_kwh)?;
        writeln!(f, "Annual savings:        {:.2}", self.annual_savings)?;
        match self.payback_years() {
            Some(years) => writeln!(f, "Payback period:        {years:.1} years")?,
            None => writeln!(f, "Payback period:        never (no savings)")?,
        }
        writeln!(
            f,
            "CO2 reduction:         {:.2} t/year",
            self.co2_reduction_tons_per_year
        )?;
        write!(f, "Trees equivalent:      {}", self.trees_equivalent)
    }
}

/// Rounds half away from zero to `places` decimals. Non-finite values pass
/// through unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

/// Closed-form solar economics estimator.
///
/// # Examples
///
/// ```
/// use solterra::estimator::{Estimator, EstimatorInput, RoofType};
///
/// let input = EstimatorInput {
///     roof_area_sq_ft: 500.0,
///     monthly_bill: 2500.0,
///     sunlight_hours_per_day: 5.0,
///     roof_type: RoofType::Flat,
///     electricity_rate_per_kwh: 2.5,
/// };
/// let out = Estimator::default().estimate(&input).unwrap();
/// assert_eq!(out.system_size_kw, 0.75);
/// assert_eq!(out.annual_production_kwh, 1368.75);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    constants: EstimatorConstants,
}

impl Estimator {
    pub fn new(constants: EstimatorConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &EstimatorConstants {
        &self.constants
    }

    /// Derives the full projection for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SolterraError::InvalidInput`] if any numeric input
    /// is non-finite, or if area, bill, or sunlight hours are `<= 0`, or the
    /// tariff is negative. Inputs large enough to overflow any derived
    /// figure are rejected the same way.
    pub fn estimate(&self, input: &EstimatorInput) -> SolterraResult<EstimatorOutput> {
        input.validate()?;
        let c = &self.constants;

        let system_size_kw = input.roof_area_sq_ft * input.roof_type.efficiency() / 100.0;
        let annual_production_kwh = system_size_kw * input.sunlight_hours_per_day * DAYS_PER_YEAR;
        let installation_cost = system_size_kw * c.installation_cost_per_kw;
        let annual_savings = annual_production_kwh * input.electricity_rate_per_kwh;
        let payback_period_years = if annual_savings > 0.0 {
            installation_cost / annual_savings
        } else {
            f64::INFINITY
        };
        let co2_reduction_tons_per_year = annual_production_kwh * c.co2_tons_per_kwh;

        for (field, value) in [
            ("system_size_kw", system_size_kw),
            ("annual_production_kwh", annual_production_kwh),
            ("installation_cost", installation_cost),
            ("annual_savings", annual_savings),
            ("co2_reduction_tons_per_year", co2_reduction_tons_per_year),
        ] {
            if !value.is_finite() {
                return Err(SolterraError::invalid(
                    field,
                    "overflows f64; inputs are too large",
                ));
            }
        }
        let trees_equivalent = (co2_reduction_tons_per_year * c.trees_per_ton_co2)
            .round()
            .max(0.0) as u64;

        Ok(EstimatorOutput {
            system_size_kw,
            installation_cost,
            annual_production_kwh,
            annual_savings,
            payback_period_years,
            co2_reduction_tons_per_year,
            trees_equivalent,
        })
    }
}

/// Estimates with the default constants.
pub fn estimate(input: &EstimatorInput) -> SolterraResult<EstimatorOutput> {
    Estimator::default().estimate(input)
}
