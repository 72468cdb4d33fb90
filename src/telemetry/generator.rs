//! Hourly mock telemetry generation.

use chrono::{DateTime, Days, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::battery::BatteryTracker;
use super::consumption::ConsumptionModel;
use super::curve::production_kwh;
use super::{SampleOrder, SystemProfile, TelemetrySample, WeatherCondition};
use crate::error::{SolterraError, SolterraResult, require_non_negative, require_positive};

pub const HOURS_PER_DAY: u32 = 24;
/// Default upper bound on `days` for a single call.
pub const MAX_DAYS: u32 = 366;

/// Tunables for [`MockTelemetryGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Day emission order.
    pub order: SampleOrder,
    /// Battery charge before the first emitted sample (percent).
    pub initial_battery_pct: f64,
    /// Percentage points per kWh of surplus, divided by battery capacity.
    pub battery_gain: f64,
    /// Capacity used when a profile does not carry one (kW).
    pub default_capacity_kw: f64,
    /// Largest `days` accepted by one call.
    pub max_days: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            order: SampleOrder::DayDescending,
            initial_battery_pct: 50.0,
            battery_gain: 10.0,
            default_capacity_kw: 10.0,
            max_days: MAX_DAYS,
        }
    }
}

/// Synthesizes `days * 24` hourly samples ending on the day of `start`.
///
/// Randomness comes only from the caller's RNG, so a seeded
/// [`rand::rngs::StdRng`] gives bit-identical output across runs.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rand::{SeedableRng, rngs::StdRng};
/// use solterra::telemetry::{MockTelemetryGenerator, SystemProfile};
///
/// let start = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let samples = MockTelemetryGenerator::default()
///     .generate(&SystemProfile::new(10.0, None), 1, start, &mut rng)
///     .unwrap();
/// assert_eq!(samples.len(), 24);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTelemetryGenerator {
    options: GeneratorOptions,
    consumption: ConsumptionModel,
}

impl MockTelemetryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            consumption: ConsumptionModel::default(),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates the series for `profile`.
    ///
    /// Day offset `d` covers the calendar day `d` days before `start`, with
    /// each sample truncated to the top of its hour. Days are emitted in
    /// [`GeneratorOptions::order`], hours 0..=23 within each day, and the
    /// battery state carries forward in emission order.
    ///
    /// # Errors
    ///
    /// [`SolterraError::InvalidInput`] when `days` is zero or above
    /// [`GeneratorOptions::max_days`], the effective capacity is not
    /// positive, the battery capacity is negative, or the battery options
    /// are out of range. No samples are returned on error.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &SystemProfile,
        days: u32,
        start: DateTime<Utc>,
        rng: &mut R,
    ) -> SolterraResult<Vec<TelemetrySample>> {
        if days == 0 {
            return Err(SolterraError::invalid("days", "must be > 0"));
        }
        if days > self.options.max_days {
            return Err(SolterraError::invalid(
                "days",
                format!("must be <= {} (got {days})", self.options.max_days),
            ));
        }
        let capacity_kw = require_positive(
            "capacity_kw",
            profile.capacity_kw.unwrap_or(self.options.default_capacity_kw),
        )?;
        let battery_kwh = match profile.battery_capacity_kwh {
            Some(kwh) => require_non_negative("battery_capacity_kwh", kwh)?,
            None => 0.0,
        };
        let initial_pct = self.options.initial_battery_pct;
        if !(0.0..=100.0).contains(&initial_pct) {
            return Err(SolterraError::invalid(
                "initial_battery_pct",
                format!("must be within 0..=100 (got {initial_pct})"),
            ));
        }
        let gain = require_positive("battery_gain", self.options.battery_gain)?;
        let mut battery =
            (battery_kwh > 0.0).then(|| BatteryTracker::new(battery_kwh, initial_pct, gain));

        let order = self.options.order;
        let day_offsets = (0..days).map(|i| match order {
            SampleOrder::DayDescending => i,
            SampleOrder::Chronological => days - 1 - i,
        });

        let start_date = start.date_naive();
        let mut samples = Vec::with_capacity(days as usize * HOURS_PER_DAY as usize);
        for offset in day_offsets {
            let date = start_date
                .checked_sub_days(Days::new(u64::from(offset)))
                .ok_or_else(|| SolterraError::invalid("days", "reaches before the calendar start"))?;

            for hour in 0..HOURS_PER_DAY {
                let timestamp = date
                    .and_hms_opt(hour, 0, 0)
                    .ok_or_else(|| SolterraError::invalid("hour", format!("{hour} out of range")))?
                    .and_utc();

                let production = production_kwh(capacity_kw, hour);
                let consumption = self.consumption.draw(hour, rng);
                let battery_percentage = battery
                    .as_mut()
                    .map(|bat| bat.step(production, consumption));

                samples.push(TelemetrySample {
                    timestamp,
                    production_kwh: production,
                    consumption_kwh: consumption,
                    battery_percentage,
                    weather_condition: WeatherCondition::for_hour(hour),
                });
            }
        }

        Ok(samples)
    }
}

/// Generates with default options: most recent day first, battery starting
/// at 50%, 10 kW when the profile has no capacity.
pub fn generate<R: Rng + ?Sized>(
    profile: &SystemProfile,
    days: u32,
    start: DateTime<Utc>,
    rng: &mut R,
) -> SolterraResult<Vec<TelemetrySample>> {
    MockTelemetryGenerator::default().generate(profile, days, start, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Timelike};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 14, 37, 12).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn one_day_has_24_samples_without_battery() {
        let samples = generate(&SystemProfile::new(10.0, None), 1, start(), &mut rng()).unwrap();
        assert_eq!(samples.len(), 24);
        assert!(samples.iter().all(|s| s.battery_percentage.is_none()));
        assert_eq!(samples[12].production_kwh, 10.0);
        let max = samples
            .iter()
            .map(|s| s.production_kwh)
            .fold(f64::MIN, f64::max);
        assert_eq!(max, samples[12].production_kwh);
    }

    #[test]
    fn timestamps_truncate_to_the_hour() {
        let samples = generate(&SystemProfile::new(10.0, None), 1, start(), &mut rng()).unwrap();
        for (hour, s) in samples.iter().enumerate() {
            assert_eq!(s.timestamp.hour(), hour as u32);
            assert_eq!(s.timestamp.minute(), 0);
            assert_eq!(s.timestamp.second(), 0);
            assert_eq!(s.timestamp.nanosecond(), 0);
            assert_eq!(s.timestamp.date_naive(), start().date_naive());
        }
    }

    #[test]
    fn days_descend_and_hours_ascend() {
        let samples = generate(&SystemProfile::new(10.0, Some(13.5)), 2, start(), &mut rng()).unwrap();
        assert_eq!(samples.len(), 48);
        let day0 = start().date_naive();
        let day1 = day0 - Duration::days(1);
        assert!(samples[..24].iter().all(|s| s.timestamp.date_naive() == day0));
        assert!(samples[24..].iter().all(|s| s.timestamp.date_naive() == day1));
        assert_eq!(samples[24].hour(), 0);
        // hour 23 of day 0 is followed by hour 0 of the previous day
        assert!(samples[24].timestamp < samples[23].timestamp);
    }

    #[test]
    fn first_battery_sample_starts_from_fifty_percent() {
        let samples = generate(&SystemProfile::new(10.0, Some(13.5)), 2, start(), &mut rng()).unwrap();
        let first = &samples[0];
        let expected = 50.0 + (first.production_kwh - first.consumption_kwh) * 10.0 / 13.5;
        assert_relative_eq!(first.battery_percentage.unwrap(), expected);
    }

    #[test]
    fn battery_carries_forward_in_emission_order() {
        let samples = generate(&SystemProfile::new(10.0, Some(13.5)), 2, start(), &mut rng()).unwrap();
        // sample 24 (day 1, hour 0) continues from sample 23 (day 0, hour 23)
        let prev = samples[23].battery_percentage.unwrap();
        let s = &samples[24];
        let expected = (prev + s.net_kwh() * 10.0 / 13.5).clamp(0.0, 100.0);
        assert_relative_eq!(s.battery_percentage.unwrap(), expected);
    }

    #[test]
    fn battery_stays_in_bounds() {
        for (capacity, battery) in [(50.0, 1.0), (0.5, 0.5), (10.0, 13.5)] {
            let samples =
                generate(&SystemProfile::new(capacity, Some(battery)), 7, start(), &mut rng()).unwrap();
            for s in &samples {
                let pct = s.battery_percentage.unwrap();
                assert!((0.0..=100.0).contains(&pct), "{pct} out of range");
            }
        }
    }

    #[test]
    fn zero_battery_disables_simulation() {
        let samples = generate(&SystemProfile::new(10.0, Some(0.0)), 1, start(), &mut rng()).unwrap();
        assert!(samples.iter().all(|s| s.battery_percentage.is_none()));
    }

    #[test]
    fn night_production_is_exactly_zero() {
        let samples = generate(&SystemProfile::new(7.0, None), 3, start(), &mut rng()).unwrap();
        for s in samples.iter().filter(|s| s.hour() < 6 || s.hour() > 18) {
            assert_eq!(s.production_kwh, 0.0);
            assert_eq!(s.weather_condition, WeatherCondition::Clear);
        }
    }

    #[test]
    fn seeded_runs_are_identical() {
        let profile = SystemProfile::new(10.0, Some(13.5));
        let a = generate(&profile, 3, start(), &mut rng()).unwrap();
        let b = generate(&profile, 3, start(), &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_capacity_uses_default() {
        let profile = SystemProfile::default();
        let samples = generate(&profile, 1, start(), &mut rng()).unwrap();
        assert_eq!(samples[12].production_kwh, 10.0);
    }

    #[test]
    fn chronological_order_is_monotonic() {
        let generator = MockTelemetryGenerator::new(GeneratorOptions {
            order: SampleOrder::Chronological,
            ..GeneratorOptions::default()
        });
        let samples = generator
            .generate(&SystemProfile::new(10.0, Some(13.5)), 3, start(), &mut rng())
            .unwrap();
        assert_eq!(samples.len(), 72);
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(samples[71].timestamp.date_naive(), start().date_naive());
    }

    #[test]
    fn rejects_invalid_inputs() {
        let cases = [
            (SystemProfile::new(10.0, None), 0),
            (SystemProfile::new(0.0, None), 1),
            (SystemProfile::new(-3.0, None), 1),
            (SystemProfile::new(10.0, Some(-1.0)), 1),
        ];
        for (profile, days) in cases {
            let result = generate(&profile, days, start(), &mut rng());
            assert!(matches!(result, Err(SolterraError::InvalidInput { .. })));
        }
    }

    #[test]
    fn days_above_cap_are_rejected_before_allocating() {
        let profile = SystemProfile::new(10.0, None);
        let result = generate(&profile, u32::MAX, start(), &mut rng());
        assert!(matches!(result, Err(SolterraError::InvalidInput { ref field, .. }) if field == "days"));

        let capped = MockTelemetryGenerator::new(GeneratorOptions {
            max_days: 2,
            ..GeneratorOptions::default()
        });
        assert_eq!(capped.generate(&profile, 2, start(), &mut rng()).unwrap().len(), 48);
        assert!(capped.generate(&profile, 3, start(), &mut rng()).is_err());
    }

    #[test]
    fn full_year_is_accepted_by_default() {
        let samples = generate(&SystemProfile::new(10.0, None), MAX_DAYS, start(), &mut rng()).unwrap();
        assert_eq!(samples.len(), MAX_DAYS as usize * 24);
    }

    #[test]
    fn non_finite_battery_gain_is_rejected() {
        for gain in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
            let generator = MockTelemetryGenerator::new(GeneratorOptions {
                battery_gain: gain,
                ..GeneratorOptions::default()
            });
            let result = generator.generate(&SystemProfile::new(10.0, Some(13.5)), 1, start(), &mut rng());
            assert!(matches!(result, Err(SolterraError::InvalidInput { ref field, .. }) if field == "battery_gain"));
        }
    }
}
