//! Simulation state and core session types
//!
//! Everything a step reads or writes lives in `SimState`. Hosts only read it between steps.

use serde::{Deserialize, Serialize};

use super::aircraft::{Aircraft, Drift, RespawnReason};
use super::field::RadioField;
use super::transmitter::{BeamTransmitter, InterferenceTransmitter, TargetMarker};
use super::waveform::WaveformHistory;
use crate::error::ConfigResult;
use crate::settings::SimConfig;

/// Lifecycle of the primary beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BeamStage {
    /// Not shown yet
    Hidden,
    /// Shown on the map, not transmitting
    Visible,
    /// Transmitting, power rising from 0 to 1
    RampingUp,
    /// Transmitting at full power
    Active,
}

impl BeamStage {
    /// Stage at world time `t`
    pub fn at(t: f64, config: &SimConfig) -> Self {
        if t < config.beam_appear_delay_secs.min(config.beam_active_delay_secs) {
            BeamStage::Hidden
        } else if t < config.beam_active_delay_secs {
            BeamStage::Visible
        } else if t < config.beam_active_delay_secs + config.power_ramp_secs {
            BeamStage::RampingUp
        } else {
            BeamStage::Active
        }
    }

    pub fn is_visible(self) -> bool {
        self != BeamStage::Hidden
    }

    /// Transmitting (ramping or full power); the aircraft only flies from here on
    pub fn is_transmitting(self) -> bool {
        self >= BeamStage::RampingUp
    }
}

/// Beam power factor at world time `t`
pub fn power_factor_at(t: f64, config: &SimConfig) -> f64 {
    if t < config.beam_active_delay_secs {
        0.0
    } else if config.power_ramp_secs == 0.0 {
        1.0
    } else {
        ((t - config.beam_active_delay_secs) / config.power_ramp_secs).clamp(0.0, 1.0)
    }
}

/// Notable things that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BeamVisible,
    TargetMarkerVisible,
    BeamActive,
    LoadDropped { x: f64, y: f64 },
    AircraftRespawned { reason: RespawnReason, x: f64, y: f64 },
    DriftFlipped { direction_radians: f64 },
}

/// Complete session state (deterministic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimConfig,
    /// World time of the most recent step, `None` before the first one
    pub time_secs: Option<f64>,
    /// Steps executed
    pub ticks: u64,
    pub field: RadioField,
    pub beam: BeamTransmitter,
    pub beam_stage: BeamStage,
    pub marker: TargetMarker,
    pub marker_visible: bool,
    pub interference: InterferenceTransmitter,
    pub interference_enabled: bool,
    pub waveforms: WaveformHistory,
    pub aircraft: Aircraft,
    pub drift: Drift,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl SimState {
    /// Build a fresh session from a validated config
    pub fn new(config: SimConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut beam = BeamTransmitter::new(&config);
        beam.power_factor = 0.0;

        Ok(Self {
            time_secs: None,
            ticks: 0,
            field: RadioField::new(config.field_size),
            beam,
            beam_stage: BeamStage::Hidden,
            marker: TargetMarker::new(&config.target_marker),
            marker_visible: false,
            interference: InterferenceTransmitter::default(),
            interference_enabled: false,
            waveforms: WaveformHistory::new(config.field_size, config.waveform_length),
            aircraft: Aircraft::new(config.aircraft_velocity, config.entry_points()),
            drift: Drift {
                direction_radians: config.initial_drift_direction(),
                velocity: config.drift_velocity,
            },
            events: Vec::new(),
            config,
        })
    }

    /// Fixed step length in seconds
    pub fn time_step_secs(&self) -> f64 {
        self.config.time_step_secs()
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record and log an event
    pub(crate) fn emit(&mut self, event: SimEvent) {
        log::info!("{event:?}");
        self.events.push(event);
    }
}
