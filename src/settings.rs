//! Session configuration
//!
//! Fixed at session start; the simulation never reconfigures itself mid-run.

use std::f64::consts::PI;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DRIFT_RELATIVE_TO_BEAM_RADIANS, ENTRY_POINT_FRACTIONS};
use crate::error::{ConfigError, ConfigResult};
use crate::normalize_angle;

/// Where a beam (or marker) sits and where it points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamPlacement {
    /// Grid cell column
    pub x: usize,
    /// Grid cell row
    pub y: usize,
    /// 0 = east, pi/2 = north, pi = west
    pub direction_radians: f64,
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Field ===
    /// Radio field is `field_size` x `field_size` cells
    pub field_size: usize,
    /// Samples per dot-dash cycle in each cell's waveform
    pub waveform_length: usize,

    // === Primary beam ===
    pub beam: BeamPlacement,
    /// Dot comes first in each cycle, starting at beam activation
    pub dot_duration_secs: f64,
    pub dash_duration_secs: f64,
    /// Width of the inner ramp of each lobe
    pub dispersion_angle_radians: f64,
    /// Amplitude outside the outer fade of a lobe. Keeps far cells visibly non-silent.
    pub signal_floor: f64,

    // === Target marker (secondary beam) ===
    pub target_marker: BeamPlacement,

    // === Timeline ===
    pub beam_appear_delay_secs: f64,
    pub marker_appear_delay_secs: f64,
    pub beam_active_delay_secs: f64,
    /// 0 means full power right at activation
    pub power_ramp_secs: f64,

    // === Aircraft ===
    /// Grid units per second
    pub aircraft_velocity: f64,
    /// Grid units per second
    pub drift_velocity: f64,
    /// Steering correction at full dot/dash imbalance
    pub max_heading_adjustment_radians: f64,

    // === Interference ===
    /// Upper bound for the interference dot/dash dials
    pub interference_max: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::for_field_size(10)
    }
}

impl SimConfig {
    /// Default layout scaled to an `n` x `n` field
    pub fn for_field_size(n: usize) -> Self {
        let size = n as f64;
        let dot_duration_secs = 0.5;
        let beam_appear_delay_secs = 1.5;
        let marker_appear_delay_secs = beam_appear_delay_secs + 1.5;
        Self {
            field_size: n,
            waveform_length: 7,

            beam: BeamPlacement {
                x: n.saturating_sub(1),
                y: 0,
                direction_radians: 0.75 * PI,
            },
            dot_duration_secs,
            // A little shorter than the Morse 3:1 dah/dit ratio
            dash_duration_secs: 2.5 * dot_duration_secs,
            dispersion_angle_radians: 0.1 * PI,
            signal_floor: 0.01,

            target_marker: BeamPlacement {
                x: (0.9 * size).floor() as usize,
                y: (0.7 * size).floor() as usize,
                direction_radians: 0.96 * PI,
            },

            beam_appear_delay_secs,
            marker_appear_delay_secs,
            beam_active_delay_secs: marker_appear_delay_secs + 1.0,
            power_ramp_secs: 1.5,

            aircraft_velocity: size / 60.0,
            drift_velocity: size / 300.0,
            max_heading_adjustment_radians: 0.3 * PI,

            interference_max: 0.5,
        }
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default config");
            return Self::default();
        };

        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.field_size == 0 {
            return Err(ConfigError::EmptyField(self.field_size));
        }
        if self.waveform_length == 0 {
            return Err(ConfigError::EmptyWaveform(self.waveform_length));
        }

        positive("dot duration", self.dot_duration_secs)?;
        positive("dash duration", self.dash_duration_secs)?;
        positive("dispersion angle", self.dispersion_angle_radians)?;
        positive("aircraft velocity", self.aircraft_velocity)?;

        non_negative("signal floor", self.signal_floor)?;
        non_negative("drift velocity", self.drift_velocity)?;
        non_negative("max heading adjustment", self.max_heading_adjustment_radians)?;
        non_negative("interference max", self.interference_max)?;
        non_negative("beam appear delay", self.beam_appear_delay_secs)?;
        non_negative("marker appear delay", self.marker_appear_delay_secs)?;
        non_negative("beam active delay", self.beam_active_delay_secs)?;
        non_negative("power ramp", self.power_ramp_secs)?;

        self.in_field("beam transmitter", &self.beam)?;
        self.in_field("target marker", &self.target_marker)?;
        Ok(())
    }

    fn in_field(&self, name: &'static str, placement: &BeamPlacement) -> ConfigResult<()> {
        if placement.x >= self.field_size || placement.y >= self.field_size {
            return Err(ConfigError::OutOfField {
                name,
                x: placement.x,
                y: placement.y,
                size: self.field_size,
            });
        }
        Ok(())
    }

    /// Duration of one dot followed by one dash
    pub fn cycle_duration_secs(&self) -> f64 {
        self.dot_duration_secs + self.dash_duration_secs
    }

    /// Fixed simulation step: short enough that every waveform slot is visited each cycle
    pub fn time_step_secs(&self) -> f64 {
        self.dot_duration_secs
            .min(self.cycle_duration_secs() / self.waveform_length as f64)
    }

    /// Aircraft entry points, in the order they are used
    pub fn entry_points(&self) -> [DVec2; 2] {
        let size = self.field_size as f64;
        ENTRY_POINT_FRACTIONS.map(|(fx, fy)| DVec2::new(fx * size, fy * size))
    }

    /// Drift direction at session start
    pub fn initial_drift_direction(&self) -> f64 {
        normalize_angle(self.beam.direction_radians - DRIFT_RELATIVE_TO_BEAM_RADIANS)
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
