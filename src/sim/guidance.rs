//! The pilot's steering law and the target check
//!
//! A real Knickebein pilot flew to make dots and dashes sound equally loud. Here the
//! pilot compares the two ends of the cell's waveform: the first slot (start of the
//! dot) and the last slot (end of the dash). Intermediate samples are ignored.

use super::transmitter::{BeamTransmitter, TargetMarker};
use super::waveform::endpoints;
use crate::consts::{NEAR_BEAM_MAX_CORRECTION_RADIANS, TARGET_LINE_TOLERANCE};

/// Heading correction for a dot/dash amplitude pair
///
/// Louder dash steers positive (counter-clockwise), louder dot steers negative.
/// The imbalance goes through a cube root so small deviations are corrected quickly;
/// a linear response lets the aircraft drift far before it reacts.
pub fn steering_correction(dot_amplitude: f64, dash_amplitude: f64, max_adjustment: f64) -> f64 {
    let difference = dash_amplitude - dot_amplitude;
    let max_amplitude = dot_amplitude.max(dash_amplitude);
    let normalized = if max_amplitude == 0.0 {
        0.0
    } else {
        difference / max_amplitude
    };
    // cbrt keeps the sign and is exact for 0 and +-1
    normalized.cbrt() * max_adjustment
}

/// Heading correction from a cell's waveform, `None` while either endpoint is unsampled
pub fn heading_correction(samples: &[Option<f64>], max_adjustment: f64) -> Option<f64> {
    match endpoints(samples) {
        (Some(first), Some(last)) => Some(steering_correction(first, last, max_adjustment)),
        _ => None,
    }
}

/// Like `heading_correction`, but flies straight down the beam when nothing is known yet
pub fn heading_correction_or_zero(samples: &[Option<f64>], max_adjustment: f64) -> f64 {
    heading_correction(samples, max_adjustment).unwrap_or(0.0)
}

/// Direction the pilot actually flies: along the beam, turned by the correction
pub fn travel_direction(beam: &BeamTransmitter, correction: f64) -> f64 {
    beam.direction_radians + correction
}

/// Whether position (`x`, `y`) is over the target: on the primary beam's centerline
/// (judged from the cell's waveform) and on the marker's beam line
pub fn is_near_target(
    samples: &[Option<f64>],
    marker: &TargetMarker,
    max_adjustment: f64,
    x: f64,
    y: f64,
) -> bool {
    let on_primary = heading_correction(samples, max_adjustment)
        .is_some_and(|c| c.abs() < NEAR_BEAM_MAX_CORRECTION_RADIANS);
    let on_marker = marker.distance_to_beam_line(x.floor(), y.floor()) < TARGET_LINE_TOLERANCE;
    on_primary && on_marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    const MAX: f64 = 0.3 * PI;

    #[test]
    fn test_balanced_signal_no_correction() {
        assert_eq!(steering_correction(0.4, 0.4, MAX), 0.0);
        assert_eq!(steering_correction(0.0, 0.0, MAX), 0.0);
    }

    #[test]
    fn test_full_imbalance_is_max_adjustment() {
        assert_abs_diff_eq!(steering_correction(0.0, 0.5, MAX), MAX);
        assert_abs_diff_eq!(steering_correction(0.5, 0.0, MAX), -MAX);
    }

    #[test]
    fn test_cube_root_shape() {
        // normalized difference 1/8 -> steering 1/2
        assert_abs_diff_eq!(steering_correction(0.8, 0.7, MAX), -0.5 * MAX, epsilon = 1e-9);
    }

    #[test]
    fn test_unset_endpoint() {
        let samples = [Some(0.5), None, None, None, None, None, None];
        assert_eq!(heading_correction(&samples, MAX), None);
        assert_eq!(heading_correction_or_zero(&samples, MAX), 0.0);

        let samples = [Some(0.5), None, None, None, None, None, Some(0.5)];
        assert_eq!(heading_correction(&samples, MAX), Some(0.0));
    }

    #[test]
    fn test_travel_direction_adds_correction() {
        let beam = BeamTransmitter::new(&SimConfig::default());
        assert_abs_diff_eq!(travel_direction(&beam, 0.1), 0.75 * PI + 0.1);
    }

    #[test]
    fn test_near_target_on_and_off_marker_line() {
        let marker = TargetMarker {
            x: 9,
            y: 7,
            direction_radians: PI,
        };
        let balanced = [Some(0.5), None, None, None, None, None, Some(0.5)];
        assert!(is_near_target(&balanced, &marker, MAX, 4.5, 7.5));
        assert!(!is_near_target(&balanced, &marker, MAX, 4.5, 8.5));

        let lopsided = [Some(0.5), None, None, None, None, None, Some(0.01)];
        assert!(!is_near_target(&lopsided, &marker, MAX, 4.5, 7.5));

        let unsampled = [None; 7];
        assert!(!is_near_target(&unsampled, &marker, MAX, 4.5, 7.5));
    }

    proptest! {
        #[test]
        fn prop_swap_negates(a in 0.0f64..2.0, b in 0.0f64..2.0) {
            prop_assume!(a + b > 0.0);
            let forward = steering_correction(a, b, MAX);
            let backward = steering_correction(b, a, MAX);
            prop_assert!((forward + backward).abs() < 1e-12);
        }

        #[test]
        fn prop_equal_amplitudes_balanced(a in 1e-6f64..10.0) {
            prop_assert_eq!(steering_correction(a, a, MAX), 0.0);
        }

        #[test]
        fn prop_correction_bounded(a in 0.0f64..2.0, b in 0.0f64..2.0) {
            prop_assert!(steering_correction(a, b, MAX).abs() <= MAX + 1e-12);
        }
    }
}
