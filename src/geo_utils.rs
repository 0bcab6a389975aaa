//! # Geographic Utilities
//!
//! Core geographic computations for geo-referenced GPR traces.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two positions |
//! | [`lerp`] | Linear interpolation between two positions |
//! | [`to_decimal_degrees`] | Raw `DDMM.mm` encoding to decimal degrees |
//! | [`to_raw_encoding`] | Decimal degrees back to the raw `DDMM.mm` encoding |
//!
//! ## Example
//!
//! ```rust
//! use gpr_tracefile::{LatLon, geo_utils};
//!
//! let a = LatLon::new(56.9496, 24.1052);
//! let b = LatLon::new(56.9500, 24.1060);
//!
//! let step = geo_utils::haversine_distance(&a, &b);
//! println!("Step: {:.1}m", step);
//!
//! // 45 degrees 30 minutes
//! let decimal = geo_utils::to_decimal_degrees(4530.0);
//! assert!((decimal - 45.5).abs() < 1e-9);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances along a survey line are short (centimeters to kilometers), well within
//! the accuracy of the spherical haversine approximation.
//!
//! ### Degree-Fraction Encoding
//!
//! Some trace formats store positions as `degrees * 100 + minutes`, e.g. `4530.0`
//! for 45°30'. The conversions truncate toward zero at the integer-degree step, so
//! negative (southern/western) values keep their sign in both parts.

use geo::{Distance, Haversine, Point};
use crate::LatLon;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance between two positions in meters.
///
/// # Example
///
/// ```rust
/// use gpr_tracefile::{LatLon, geo_utils};
///
/// let a = LatLon::new(51.5074, -0.1278);
/// let b = LatLon::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&a, &b);
/// assert!((distance - 343_560.0).abs() < 1000.0);
/// ```
#[inline]
pub fn haversine_distance(p1: &LatLon, p2: &LatLon) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Linear interpolation between two positions; `t` in `[0, 1]`.
///
/// Planar interpolation in degrees, adequate for the short spans between
/// consecutive survey fixes.
#[inline]
pub fn lerp(from: &LatLon, to: &LatLon, t: f64) -> LatLon {
    LatLon::new(
        from.latitude + (to.latitude - from.latitude) * t,
        from.longitude + (to.longitude - from.longitude) * t,
    )
}

// =============================================================================
// Degree-Fraction Conversion
// =============================================================================

/// Convert a raw `degrees * 100 + minutes` value to decimal degrees.
///
/// `v = raw / 100; d = trunc(v); result = d + (v - d) / 60 * 100`
///
/// # Example
///
/// ```rust
/// use gpr_tracefile::geo_utils::to_decimal_degrees;
///
/// assert!((to_decimal_degrees(4530.0) - 45.5).abs() < 1e-9);
/// assert!((to_decimal_degrees(-4530.0) + 45.5).abs() < 1e-9);
/// ```
pub fn to_decimal_degrees(raw: f64) -> f64 {
    let value = raw / 100.0;
    let degrees = value.trunc();
    let fraction = value - degrees;
    degrees + fraction / 60.0 * 100.0
}

/// Convert decimal degrees back to the raw `degrees * 100 + minutes` value.
///
/// Approximate inverse of [`to_decimal_degrees`].
///
/// `d = trunc(decimal); f = (decimal - d) * 60 / 100; result = 100 * (d + f)`
pub fn to_raw_encoding(decimal: f64) -> f64 {
    let degrees = decimal.trunc();
    let fraction = decimal - degrees;
    let minutes = fraction * 60.0 / 100.0;
    100.0 * (degrees + minutes)
}

// =============================================================================
// Unit Tests
// =============================================================================
