//! Surface geometry and guarded arithmetic.
//!
//! Everything that ends up in a long-lived cache goes through these helpers
//! so NaN and infinity never get blended into future ticks.

use serde::{Deserialize, Serialize};

/// Mean radius of Mars in km.
pub const MARS_RADIUS_KM: f64 = 3_389.5;

/// Denominators smaller than this are treated as zero.
pub const DIVISION_EPSILON: f64 = 1e-9;

/// A point on the Martian surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in km (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();
        MARS_RADIUS_KM * c
    }
}

/// `numerator / denominator`, or `fallback` when the denominator is
/// (near) zero or the result is not finite.
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < DIVISION_EPSILON {
        return fallback;
    }
    finite_or(numerator / denominator, fallback)
}

/// The value itself if finite, otherwise `fallback`.
#[must_use]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Natural log scaled rate: `ln(1 + x) / sols`, with `x` floored at zero.
#[must_use]
pub fn log_rate(x: f64, sols: f64) -> f64 {
    let x = finite_or(x, 0.0).max(0.0);
    safe_div(x.ln_1p(), sols, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinates::new(-4.5, 137.4);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(-4.5, 137.4);
        let b = Coordinates::new(18.4, 77.5);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_meridian() {
        let equator = Coordinates::new(0.0, 0.0);
        let pole = Coordinates::new(90.0, 0.0);
        let expected = MARS_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((equator.distance_km(&pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_safe_div_guards_zero() {
        assert!((safe_div(10.0, 0.0, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((safe_div(10.0, 4.0, 0.0) - 2.5).abs() < f64::EPSILON);
        assert!((safe_div(f64::INFINITY, 1.0, 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_log_rate() {
        assert!(log_rate(0.0, 1.0).abs() < f64::EPSILON);
        assert!((log_rate(std::f64::consts::E - 1.0, 2.0) - 0.5).abs() < 1e-12);
        assert!(log_rate(-5.0, 1.0).abs() < f64::EPSILON);
        assert!(log_rate(100.0, 0.0).abs() < f64::EPSILON);
    }
}
