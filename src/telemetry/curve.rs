//! Clear-sky production curve shared by every generated day.

/// First daylight hour (inclusive).
pub const SUNRISE_HOUR: u32 = 6;
/// Last daylight hour (inclusive).
pub const SUNSET_HOUR: u32 = 18;
/// Hour of peak production.
pub const SOLAR_NOON_HOUR: f64 = 12.0;
/// Width of the bell curve in hours.
pub const CURVE_SIGMA_HOURS: f64 = 3.0;

pub fn is_daylight(hour: u32) -> bool {
    (SUNRISE_HOUR..=SUNSET_HOUR).contains(&hour)
}

/// Fraction of nameplate capacity produced during `hour`.
///
/// A Gaussian bell peaking at noon, truncated to zero outside
/// `SUNRISE_HOUR..=SUNSET_HOUR`.
pub fn daylight_frac(hour: u32) -> f64 {
    if !is_daylight(hour) {
        return 0.0;
    }
    let z = (f64::from(hour) - SOLAR_NOON_HOUR) / CURVE_SIGMA_HOURS;
    (-0.5 * z * z).exp()
}

/// Energy produced in one hour by a system of `capacity_kw`.
pub fn production_kwh(capacity_kw: f64, hour: u32) -> f64 {
    capacity_kw * daylight_frac(hour)
}
