//! Psychrometric closed forms for derived devices
//!
//! Virtual sensors commonly derive moisture quantities from a temperature
//! and a relative-humidity channel. Both formulas here are the Magnus-type
//! approximations, accurate to a few hundredths of a degree over the
//! -40..50 C range a weather station sees.
//!
//! Inputs are the *filtered* readings of the source devices; a humidity of
//! zero or below has no defined dew point and the result propagates as
//! non-finite, which the registry's NaN handling then turns into a zeroed
//! reading and a cleared presence flag.

use libm::{expf, logf};

/// Dew point in degrees Celsius from air temperature (`temp_c`, C) and
/// relative humidity (`rh_pct`, percent).
///
/// ```
/// use stratus_core::physics::dew_point;
///
/// let dp = dew_point(20.0, 50.0);
/// assert!((dp - 9.25).abs() < 0.1);
/// ```
pub fn dew_point(temp_c: f32, rh_pct: f32) -> f32 {
    const A: f32 = 17.271;
    const B: f32 = 237.7;
    let gamma = (A * temp_c) / (B + temp_c) + logf(rh_pct * 0.01);
    (B * gamma) / (A - gamma)
}

/// Absolute humidity in grams of water per cubic metre of air.
///
/// ```
/// use stratus_core::physics::absolute_humidity;
///
/// let ah = absolute_humidity(20.0, 50.0);
/// assert!((ah - 8.6).abs() < 0.2);
/// ```
pub fn absolute_humidity(temp_c: f32, rh_pct: f32) -> f32 {
    (6.112 * expf((17.67 * temp_c) / (temp_c + 243.5)) * rh_pct * 2.1674) / (273.15 + temp_c)
}
