//! Naive battery state-of-charge tracker for mock telemetry.

/// Carries battery percentage from one emitted sample to the next.
///
/// Each step moves the charge by `(production - consumption) * gain /
/// capacity_kwh` percentage points and clamps to `[0, 100]`.
#[derive(Debug, Clone)]
pub struct BatteryTracker {
    /// Battery capacity in kWh (> 0).
    pub capacity_kwh: f64,
    /// Percentage points per kWh of surplus, scaled by capacity.
    pub gain: f64,
    /// Current state of charge in percent.
    pct: f64,
}

impl BatteryTracker {
    /// # Panics
    ///
    /// Panics if `capacity_kwh <= 0` or `initial_pct` is outside `[0, 100]`.
    pub fn new(capacity_kwh: f64, initial_pct: f64, gain: f64) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!((0.0..=100.0).contains(&initial_pct));
        Self {
            capacity_kwh,
            gain,
            pct: initial_pct,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.pct
    }

    /// Applies one hour of surplus (or deficit) and returns the new charge.
    pub fn step(&mut self, production_kwh: f64, consumption_kwh: f64) -> f64 {
        let change = (production_kwh - consumption_kwh) * self.gain / self.capacity_kwh;
        self.pct = (self.pct + change).clamp(0.0, 100.0);
        self.pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deficit_discharges() {
        let mut bat = BatteryTracker::new(10.0, 50.0, 10.0);
        // -2 kWh * 10 / 10 kWh = -2 points
        assert_eq!(bat.step(0.0, 2.0), 48.0);
        assert_eq!(bat.percentage(), 48.0);
    }

    #[test]
    fn surplus_charges() {
        let mut bat = BatteryTracker::new(10.0, 50.0, 10.0);
        assert_eq!(bat.step(8.0, 3.0), 55.0);
    }

    #[test]
    fn clamps_to_bounds() {
        let mut bat = BatteryTracker::new(1.0, 95.0, 10.0);
        assert_eq!(bat.step(10.0, 0.0), 100.0);
        let mut bat = BatteryTracker::new(1.0, 5.0, 10.0);
        assert_eq!(bat.step(0.0, 10.0), 0.0);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        BatteryTracker::new(0.0, 50.0, 10.0);
    }
}
