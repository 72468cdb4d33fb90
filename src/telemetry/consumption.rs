//! Household consumption: a noisy baseline plus morning and evening peaks.

use rand::Rng;

/// Hourly consumption draw parameters.
///
/// Every hour draws `base_kwh + U(0, base_jitter_kwh)`; peak hours add a
/// second draw of `peak_kwh + U(0, peak_jitter_kwh)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionModel {
    pub base_kwh: f64,
    pub base_jitter_kwh: f64,
    pub peak_kwh: f64,
    pub peak_jitter_kwh: f64,
}

impl Default for ConsumptionModel {
    fn default() -> Self {
        Self {
            base_kwh: 1.0,
            base_jitter_kwh: 0.5,
            peak_kwh: 2.0,
            peak_jitter_kwh: 1.5,
        }
    }
}

/// Morning (06-09) and evening (17-21) demand peaks, inclusive.
pub fn is_peak_hour(hour: u32) -> bool {
    (6..=9).contains(&hour) || (17..=21).contains(&hour)
}

impl ConsumptionModel {
    /// Draws the consumption for `hour`. Always `>= base_kwh`.
    ///
    /// Consumes one uniform draw off-peak and two during peak hours.
    pub fn draw<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> f64 {
        let mut kwh = self.base_kwh + rng.random::<f64>() * self.base_jitter_kwh;
        if is_peak_hour(hour) {
            kwh += self.peak_kwh + rng.random::<f64>() * self.peak_jitter_kwh;
        }
        kwh
    }
}
