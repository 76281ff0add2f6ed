//! Knickebein - a radio-beam bomber guidance simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (radio field, transmitters, waveforms, aircraft)
//! - `settings`: Session configuration and validation
//! - `platform`: Browser/native host glue (wall clock, wasm bindings)
//! - `error`: Configuration errors

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, ConfigResult};
pub use settings::SimConfig;

use glam::DVec2;

/// Fixed model constants (not configurable)
pub mod consts {
    use std::f64::consts::PI;

    /// Beam strength inside the full-strength lobe. Half of 1.0 so interference can exceed it.
    pub const SIGNAL_HALF_STRENGTH: f64 = 0.5;
    /// Mirrored deviation where the outer edge of a lobe starts fading
    pub const OUTER_FADEOUT_START_RADIANS: f64 = 0.15 * PI;
    /// Mirrored deviation where the outer edge of a lobe is gone
    pub const OUTER_FADEOUT_GONE_RADIANS: f64 = 0.23 * PI;

    /// Largest heading correction still judged "on the beam centerline"
    pub const NEAR_BEAM_MAX_CORRECTION_RADIANS: f64 = 0.17 * PI;
    /// Max perpendicular distance (grid units) from the target marker's beam line
    pub const TARGET_LINE_TOLERANCE: f64 = 0.5;

    /// Drift direction relative to the beam at session start (-pi/2 = left of the beam)
    pub const DRIFT_RELATIVE_TO_BEAM_RADIANS: f64 = -PI / 2.0;

    /// Aircraft entry points as fractions of the field size, used alternately
    pub const ENTRY_POINT_FRACTIONS: [(f64, f64); 2] = [(0.7, 0.0), (0.999, 0.5)];
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = modulo(angle, TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Mathematical modulo: result is in [0, n) for positive `n`, also for negative `x`
#[inline]
pub fn modulo(x: f64, n: f64) -> f64 {
    let r = x.rem_euclid(n);
    // rem_euclid can round up to exactly n for tiny negative x
    if r >= n { 0.0 } else { r }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Unit vector pointing along `angle` (0 = east, counter-clockwise positive)
#[inline]
pub fn heading_vector(angle: f64) -> DVec2 {
    DVec2::from_angle(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert_abs_diff_eq!(normalize_angle(0.0), 0.0);
        assert_abs_diff_eq!(normalize_angle(PI), PI);
        assert_abs_diff_eq!(normalize_angle(-PI), PI);
        assert_abs_diff_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-0.25 * PI), -0.25 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(9.0 * PI + 0.1), -PI + 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_modulo_negative() {
        assert_abs_diff_eq!(modulo(-4.0, 1.75), 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(modulo(3.5, 1.75), 0.0, epsilon = 1e-12);
        assert!(modulo(-1e-18, 1.75) < 1.75);
    }

    #[test]
    fn test_lerp_and_heading() {
        assert_abs_diff_eq!(lerp(2.0, 4.0, 0.25), 2.5);
        let v = heading_vector(PI / 2.0);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
    }
}
