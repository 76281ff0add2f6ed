//! The bomber: follows the beam by ear, pushed sideways by the wind
//!
//! One aircraft at a time. When it leaves the field, or has dropped its load and
//! flown on past the target, a fresh one enters at the next entry point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::guidance::{heading_correction_or_zero, is_near_target, travel_direction};
use super::transmitter::{BeamTransmitter, TargetMarker};
use super::waveform::WaveformHistory;
use crate::{heading_vector, normalize_angle};

/// Constant ambient drift applied on top of the pilot's own motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub direction_radians: f64,
    /// Grid units per second
    pub velocity: f64,
}

impl Drift {
    /// Turn the wind around
    pub fn flip(&mut self) {
        self.direction_radians = normalize_angle(self.direction_radians + std::f64::consts::PI);
    }

    pub fn vector(&self) -> DVec2 {
        heading_vector(self.direction_radians) * self.velocity
    }
}

/// Why an aircraft was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RespawnReason {
    /// Flew out of the radio field
    LeftField,
    /// Dropped its load and flew on past the target
    PassComplete,
}

/// Result of checking the aircraft after a kinematics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub respawned: Option<RespawnReason>,
    /// Load was dropped on this step (not on an earlier one)
    pub load_dropped: bool,
}

/// The aircraft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    /// Grid-fractional position
    pub pos: DVec2,
    /// Grid units per second
    pub velocity: f64,
    pub load_dropped: bool,
    /// Correction applied on the last step, for the yoke display
    pub last_correction: Option<f64>,
    entry_points: [DVec2; 2],
    next_entry: usize,
}

impl Aircraft {
    /// Spawn at the first entry point
    pub fn new(velocity: f64, entry_points: [DVec2; 2]) -> Self {
        let mut aircraft = Self {
            pos: DVec2::ZERO,
            velocity,
            load_dropped: false,
            last_correction: None,
            entry_points,
            next_entry: 0,
        };
        aircraft.respawn();
        aircraft
    }

    /// Move to the next entry point (alternating) with the load still aboard
    pub fn respawn(&mut self) {
        self.pos = self.entry_points[self.next_entry];
        self.next_entry = 1 - self.next_entry;
        self.load_dropped = false;
    }

    pub fn entry_points(&self) -> &[DVec2; 2] {
        &self.entry_points
    }

    /// Cell under the aircraft, `None` when outside a `size` x `size` field
    pub fn cell(&self, size: usize) -> Option<(usize, usize)> {
        let (fx, fy) = (self.pos.x.floor(), self.pos.y.floor());
        let limit = size as f64;
        if fx < 0.0 || fy < 0.0 || fx >= limit || fy >= limit {
            None
        } else {
            Some((fx as usize, fy as usize))
        }
    }

    /// Listen, steer, and integrate one step of `dt` seconds
    ///
    /// An aircraft that starts the step outside the field is replaced instead of moved.
    pub fn step(
        &mut self,
        dt: f64,
        waveforms: &WaveformHistory,
        beam: &BeamTransmitter,
        drift: &Drift,
        max_adjustment: f64,
    ) -> Option<RespawnReason> {
        let Some((cx, cy)) = self.cell(waveforms.size()) else {
            self.respawn();
            return Some(RespawnReason::LeftField);
        };

        let correction = heading_correction_or_zero(waveforms.cell(cx, cy), max_adjustment);
        self.last_correction = Some(correction);

        let direction = travel_direction(beam, correction);
        self.pos += heading_vector(direction) * self.velocity * dt;
        self.pos += drift.vector() * dt;
        None
    }

    /// Bounds and target checks after a step; respawns when the pass is over
    pub fn evaluate_pass(
        &mut self,
        waveforms: &WaveformHistory,
        marker: &TargetMarker,
        max_adjustment: f64,
    ) -> PassOutcome {
        let mut outcome = PassOutcome::default();

        let cell = match self.cell(waveforms.size()) {
            Some(cell) => cell,
            None => {
                self.respawn();
                outcome.respawned = Some(RespawnReason::LeftField);
                // Entry points are inside the field
                match self.cell(waveforms.size()) {
                    Some(cell) => cell,
                    None => return outcome,
                }
            }
        };

        let near = is_near_target(
            waveforms.cell(cell.0, cell.1),
            marker,
            max_adjustment,
            self.pos.x,
            self.pos.y,
        );
        if near {
            outcome.load_dropped = !self.load_dropped;
            self.load_dropped = true;
        } else if self.load_dropped {
            self.respawn();
            outcome.respawned = Some(RespawnReason::PassComplete);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::field::RadioField;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn setup() -> (SimConfig, BeamTransmitter, WaveformHistory, TargetMarker) {
        let config = SimConfig::default();
        let beam = BeamTransmitter::new(&config);
        let waveforms = WaveformHistory::new(config.field_size, config.waveform_length);
        let marker = TargetMarker::new(&config.target_marker);
        (config, beam, waveforms, marker)
    }

    fn calm() -> Drift {
        Drift {
            direction_radians: 0.0,
            velocity: 0.0,
        }
    }

    #[test]
    fn test_spawn_alternates_entry_points() {
        let config = SimConfig::default();
        let mut aircraft = Aircraft::new(1.0, config.entry_points());
        assert_abs_diff_eq!(aircraft.pos.x, 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(aircraft.pos.y, 0.0);

        aircraft.load_dropped = true;
        aircraft.respawn();
        assert_abs_diff_eq!(aircraft.pos.x, 9.99, epsilon = 1e-12);
        assert_abs_diff_eq!(aircraft.pos.y, 5.0);
        assert!(!aircraft.load_dropped);

        aircraft.respawn();
        assert_abs_diff_eq!(aircraft.pos.x, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unsampled_cell_flies_down_the_beam() {
        let (config, beam, waveforms, _) = setup();
        let mut aircraft = Aircraft::new(config.aircraft_velocity, config.entry_points());
        let start = aircraft.pos;
        let respawned = aircraft.step(1.0, &waveforms, &beam, &calm(), config.max_heading_adjustment_radians);
        assert_eq!(respawned, None);

        assert_eq!(aircraft.last_correction, Some(0.0));
        let moved = aircraft.pos - start;
        assert_abs_diff_eq!(moved.length(), config.aircraft_velocity, epsilon = 1e-12);
        assert_abs_diff_eq!(moved.y.atan2(moved.x), 0.75 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_drift_adds_independently() {
        let (config, beam, waveforms, _) = setup();
        let mut aircraft = Aircraft::new(config.aircraft_velocity, config.entry_points());
        let start = aircraft.pos;
        let drift = Drift {
            direction_radians: -PI / 2.0,
            velocity: 0.2,
        };
        aircraft.step(0.5, &waveforms, &beam, &drift, config.max_heading_adjustment_radians);

        let expected = start
            + heading_vector(0.75 * PI) * config.aircraft_velocity * 0.5
            + DVec2::new(0.0, -0.1);
        assert_abs_diff_eq!(aircraft.pos.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(aircraft.pos.y, expected.y, epsilon = 1e-12);
    }

    #[test]
    fn test_flip_drift() {
        let mut drift = Drift {
            direction_radians: -0.75 * PI,
            velocity: 0.1,
        };
        drift.flip();
        assert_abs_diff_eq!(drift.direction_radians, 0.25 * PI, epsilon = 1e-12);
        drift.flip();
        assert_abs_diff_eq!(drift.direction_radians, -0.75 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_leaving_field_respawns() {
        let (config, _, waveforms, marker) = setup();
        let mut aircraft = Aircraft::new(config.aircraft_velocity, config.entry_points());
        aircraft.pos = DVec2::new(config.field_size as f64, 3.0);
        aircraft.load_dropped = true;

        let outcome =
            aircraft.evaluate_pass(&waveforms, &marker, config.max_heading_adjustment_radians);
        assert_eq!(outcome.respawned, Some(RespawnReason::LeftField));
        assert!(config.entry_points().contains(&aircraft.pos));
        assert!(!aircraft.load_dropped);
    }

    #[test]
    fn test_step_from_outside_respawns() {
        let (config, beam, waveforms, _) = setup();
        let mut aircraft = Aircraft::new(config.aircraft_velocity, config.entry_points());
        aircraft.pos = DVec2::new(config.field_size as f64, 3.0);
        aircraft.load_dropped = true;

        let respawned = aircraft.step(0.25, &waveforms, &beam, &calm(), config.max_heading_adjustment_radians);
        assert_eq!(respawned, Some(RespawnReason::LeftField));
        assert_eq!(aircraft.pos, config.entry_points()[1]);
        assert!(!aircraft.load_dropped);
    }

    #[test]
    fn test_negative_coordinate_is_outside() {
        let aircraft = Aircraft {
            pos: DVec2::new(-0.01, 4.0),
            ..Aircraft::new(1.0, SimConfig::default().entry_points())
        };
        assert_eq!(aircraft.cell(10), None);
    }

    #[test]
    fn test_load_drop_then_pass_complete() {
        let (config, _, _, marker) = setup();
        let size = config.field_size;
        let mut field = RadioField::new(size);
        let mut waveforms = WaveformHistory::new(size, config.waveform_length);
        let mut beam = BeamTransmitter::new(&config);

        // Equal dot and dash everywhere: every cell reads as on the centerline
        field.accumulate_uniform(0.5);
        beam.update_phase(0.0);
        waveforms.update(&field, &beam);
        beam.update_phase(1.7);
        waveforms.update(&field, &beam);

        let mut aircraft = Aircraft::new(config.aircraft_velocity, config.entry_points());
        // On the marker's line (y = 7) inside the field
        aircraft.pos = DVec2::new(6.2, 7.3);
        let outcome =
            aircraft.evaluate_pass(&waveforms, &marker, config.max_heading_adjustment_radians);
        assert!(outcome.load_dropped);
        assert!(aircraft.load_dropped);

        // Still over the target: no new drop
        let outcome =
            aircraft.evaluate_pass(&waveforms, &marker, config.max_heading_adjustment_radians);
        assert!(!outcome.load_dropped);

        // Off the marker line: pass complete
        aircraft.pos = DVec2::new(6.2, 2.3);
        let outcome =
            aircraft.evaluate_pass(&waveforms, &marker, config.max_heading_adjustment_radians);
        assert_eq!(outcome.respawned, Some(RespawnReason::PassComplete));
        assert!(!aircraft.load_dropped);
    }
}
