//! Transmitters: the keyed beam, the target marker and the interference broadcast
//!
//! The beam is a crude two-lobe pattern, not a real antenna model. During the dot
//! the lobe sits on one side of the centerline, during the dash it is mirrored onto
//! the other. A receiver hears equal dot and dash amplitude only on the centerline.

use serde::{Deserialize, Serialize};

use super::field::RadioField;
use crate::consts::{OUTER_FADEOUT_GONE_RADIANS, OUTER_FADEOUT_START_RADIANS, SIGNAL_HALF_STRENGTH};
use crate::settings::{BeamPlacement, SimConfig};
use crate::{lerp, modulo, normalize_angle};

/// Amplitude of one lobe as a function of the mirrored deviation from the centerline
///
/// Positive deviation runs from the centerline out across the full-strength lobe
/// and its outer fade; negative deviation runs into the short dispersion ramp.
pub fn beam_response(deviation: f64, dispersion_angle: f64, floor: f64) -> f64 {
    if deviation >= OUTER_FADEOUT_GONE_RADIANS {
        floor
    } else if deviation >= OUTER_FADEOUT_START_RADIANS {
        let t = (deviation - OUTER_FADEOUT_START_RADIANS)
            / (OUTER_FADEOUT_GONE_RADIANS - OUTER_FADEOUT_START_RADIANS);
        lerp(SIGNAL_HALF_STRENGTH, 0.0, t)
    } else if deviation >= 0.0 {
        SIGNAL_HALF_STRENGTH
    } else if deviation < -dispersion_angle {
        0.0
    } else {
        lerp(0.0, SIGNAL_HALF_STRENGTH, 1.0 + deviation / dispersion_angle)
    }
}

/// The keyed directional beam (the primary Knickebein transmitter)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamTransmitter {
    /// Grid cell the transmitter occupies
    pub x: usize,
    pub y: usize,
    pub direction_radians: f64,
    pub dot_duration_secs: f64,
    pub dash_duration_secs: f64,
    pub dispersion_angle_radians: f64,
    pub signal_floor: f64,
    /// 0.0 - 1.0, ramped up after activation
    pub power_factor: f64,
    /// Seconds into the current dot-dash cycle
    pub phase_secs: f64,
    /// `phase_secs` as a fraction of the cycle, in [0, 1)
    pub phase_fraction: f64,
    pub is_dot: bool,
}

impl BeamTransmitter {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            x: config.beam.x,
            y: config.beam.y,
            direction_radians: config.beam.direction_radians,
            dot_duration_secs: config.dot_duration_secs,
            dash_duration_secs: config.dash_duration_secs,
            dispersion_angle_radians: config.dispersion_angle_radians,
            signal_floor: config.signal_floor,
            power_factor: 1.0,
            phase_secs: 0.0,
            phase_fraction: 0.0,
            is_dot: true,
        }
    }

    pub fn is_dash(&self) -> bool {
        !self.is_dot
    }

    pub fn cycle_duration_secs(&self) -> f64 {
        self.dot_duration_secs + self.dash_duration_secs
    }

    /// Update the dot/dash phase for `timestamp` (seconds since the keying started;
    /// negative before that)
    pub fn update_phase(&mut self, timestamp: f64) {
        let cycle = self.cycle_duration_secs();
        self.phase_secs = modulo(timestamp, cycle);
        self.phase_fraction = self.phase_secs / cycle;
        self.is_dot = self.phase_secs < self.dot_duration_secs;
    }

    /// Signed angle between the centerline and the direction to a cell.
    /// Negative: cell is left of the centerline (looking along the beam).
    pub fn deviation_at(&self, x: usize, y: usize) -> f64 {
        let bearing = (y as f64 - self.y as f64).atan2(x as f64 - self.x as f64);
        normalize_angle(self.direction_radians - bearing)
    }

    /// What this transmitter puts into a cell right now
    pub fn amplitude_at(&self, x: usize, y: usize) -> f64 {
        if (x, y) == (self.x, self.y) {
            return 0.0;
        }
        let mirror = if self.is_dot { -1.0 } else { 1.0 };
        let deviation = mirror * self.deviation_at(x, y);
        beam_response(deviation, self.dispersion_angle_radians, self.signal_floor)
            * self.power_factor
    }

    /// Advance to `timestamp` and add this beam's contribution to the field
    pub fn step(&mut self, field: &mut RadioField, timestamp: f64) {
        self.update_phase(timestamp);
        for (x, y) in field.cells() {
            if (x, y) == (self.x, self.y) {
                continue;
            }
            field.accumulate(x, y, self.amplitude_at(x, y));
        }
    }
}

/// The secondary beam. Only its line matters: where it crosses the primary beam is the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetMarker {
    pub x: usize,
    pub y: usize,
    pub direction_radians: f64,
}

impl TargetMarker {
    pub fn new(placement: &BeamPlacement) -> Self {
        Self {
            x: placement.x,
            y: placement.y,
            direction_radians: placement.direction_radians,
        }
    }

    /// Perpendicular distance from the center of cell (`cx`, `cy`) to the marker's beam line.
    /// The marker counts as sitting in the middle of its own cell.
    pub fn distance_to_beam_line(&self, cx: f64, cy: f64) -> f64 {
        let (sin, cos) = self.direction_radians.sin_cos();
        let dx = (cx + 0.5) - (self.x as f64 + 0.5);
        let dy = (cy + 0.5) - (self.y as f64 + 0.5);
        (sin * dx - cos * dy).abs()
    }
}

/// Uniform broadcast keyed in step with the beam (the British "Aspirin" jammer)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterferenceTransmitter {
    /// Sent while the beam is in its dot phase
    pub dot_amplitude: f64,
    /// Sent while the beam is in its dash phase
    pub dash_amplitude: f64,
    /// What went out on the last step
    pub last_amplitude: f64,
}

impl InterferenceTransmitter {
    /// Bring a dial value into [0, `max`]; NaN reads as off
    pub fn clamp_amplitude(value: f64, max: f64) -> f64 {
        if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
    }

    /// Amplitude matching the beam's current key state
    pub fn amplitude_for(&self, beam: &BeamTransmitter) -> f64 {
        if beam.is_dot {
            self.dot_amplitude
        } else {
            self.dash_amplitude
        }
    }

    /// Add the broadcast to every cell
    pub fn step(&mut self, field: &mut RadioField, beam: &BeamTransmitter) {
        let amplitude = self.amplitude_for(beam);
        self.last_amplitude = amplitude;
        field.accumulate_uniform(amplitude);
    }
}
