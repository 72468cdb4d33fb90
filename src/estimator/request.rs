//! Wire shapes for the savings calculator.
//!
//! Field names follow the calculator form (`roofArea`, `sunlightHours`, ...)
//! so existing clients keep working against the HTTP service.

use serde::{Deserialize, Serialize};

use super::{EstimatorInput, EstimatorOutput, RoofType, RoofTypePolicy};
use crate::error::SolterraResult;

/// Unvalidated calculator request. The roof type stays a free-form string
/// until [`EstimateRequest::to_input`] applies a [`RoofTypePolicy`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub roof_area: f64,
    pub monthly_bill: f64,
    pub sunlight_hours: f64,
    pub roof_type: String,
    pub electricity_rate: f64,
    /// Free-text location; carried for the caller's records only.
    #[serde(default)]
    pub location: Option<String>,
    /// When present, hosts persist the calculation for this user.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl EstimateRequest {
    pub fn to_input(&self, policy: RoofTypePolicy) -> SolterraResult<EstimatorInput> {
        let input = EstimatorInput {
            roof_area_sq_ft: self.roof_area,
            monthly_bill: self.monthly_bill,
            sunlight_hours_per_day: self.sunlight_hours,
            roof_type: RoofType::parse(&self.roof_type, policy)?,
            electricity_rate_per_kwh: self.electricity_rate,
        };
        input.validate()?;
        Ok(input)
    }
}

/// Rounded calculator result as returned to clients.
///
/// `payback_period` is `None` (JSON `null`) when there are no savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub system_size: f64,
    pub installation_cost: f64,
    pub annual_production: f64,
    pub annual_savings: f64,
    pub payback_period: Option<f64>,
    pub co2_reduction: f64,
    pub trees_equivalent: u64,
}

impl From<&EstimatorOutput> for EstimateResponse {
    fn from(out: &EstimatorOutput) -> Self {
        let r = out.rounded();
        Self {
            system_size: r.system_size_kw,
            installation_cost: r.installation_cost,
            annual_production: r.annual_production_kwh,
            annual_savings: r.annual_savings,
            payback_period: r.payback_years(),
            co2_reduction: r.co2_reduction_tons_per_year,
            trees_equivalent: r.trees_equivalent,
        }
    }
}
