//! Read-only views of the session for renderers, audio and UI
//!
//! Built between steps. Nothing in here mutates the simulation.

use glam::DVec2;
use serde::Serialize;

use super::guidance::{heading_correction_or_zero, is_near_target, travel_direction};
use super::state::{BeamStage, SimState};

/// Primary beam as shown on the map
#[derive(Debug, Clone, Serialize)]
pub struct BeamView {
    pub x: usize,
    pub y: usize,
    pub direction_radians: f64,
    pub phase_fraction: f64,
    pub is_dot: bool,
    pub power_factor: f64,
    pub stage: BeamStage,
    pub visible: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerView {
    pub x: usize,
    pub y: usize,
    pub direction_radians: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterferenceView {
    pub enabled: bool,
    pub dot_amplitude: f64,
    pub dash_amplitude: f64,
    pub last_amplitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AircraftView {
    pub pos: DVec2,
    pub velocity: f64,
    pub last_correction: Option<f64>,
    pub load_dropped: bool,
    pub drift_direction_radians: f64,
    pub drift_velocity: f64,
}

/// One arrow of the direction-field overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionArrow {
    pub x: usize,
    pub y: usize,
    pub direction_radians: f64,
}

/// What the receiver at the aircraft hears, split by source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalSplit {
    pub total: f64,
    pub interference: f64,
    pub beam: f64,
}

/// Everything a frame needs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time_secs: Option<f64>,
    pub field_size: usize,
    /// Column-major, `x * field_size + y`
    pub amplitudes: Vec<f64>,
    pub beam: BeamView,
    pub marker: MarkerView,
    pub interference: InterferenceView,
    /// One run of `waveform_length` slots per cell, same order as `amplitudes`
    pub waveforms: Vec<Vec<Option<f64>>>,
    pub aircraft: AircraftView,
    pub signal: Option<SignalSplit>,
    pub direction_field: Vec<DirectionArrow>,
    pub projected_targets: Vec<(usize, usize)>,
}

impl Snapshot {
    pub fn capture(state: &SimState) -> Self {
        let field = &state.field;
        let beam = &state.beam;

        Self {
            time_secs: state.time_secs,
            field_size: field.size(),
            amplitudes: field.amplitudes().to_vec(),
            beam: BeamView {
                x: beam.x,
                y: beam.y,
                direction_radians: beam.direction_radians,
                phase_fraction: beam.phase_fraction,
                is_dot: beam.is_dot,
                power_factor: beam.power_factor,
                stage: state.beam_stage,
                visible: state.beam_stage.is_visible(),
                active: state.beam_stage.is_transmitting(),
            },
            marker: MarkerView {
                x: state.marker.x,
                y: state.marker.y,
                direction_radians: state.marker.direction_radians,
                visible: state.marker_visible,
            },
            interference: InterferenceView {
                enabled: state.interference_enabled,
                dot_amplitude: state.interference.dot_amplitude,
                dash_amplitude: state.interference.dash_amplitude,
                last_amplitude: state.interference.last_amplitude,
            },
            waveforms: field
                .cells()
                .map(|(x, y)| state.waveforms.cell(x, y).to_vec())
                .collect(),
            aircraft: AircraftView {
                pos: state.aircraft.pos,
                velocity: state.aircraft.velocity,
                last_correction: state.aircraft.last_correction,
                load_dropped: state.aircraft.load_dropped,
                drift_direction_radians: state.drift.direction_radians,
                drift_velocity: state.drift.velocity,
            },
            signal: signal_at_aircraft(state),
            direction_field: direction_field(state),
            projected_targets: projected_targets(state),
        }
    }
}

/// Direction an aircraft would fly from each cell, given what it hears there.
/// The transmitter's own cell has no arrow.
pub fn direction_field(state: &SimState) -> Vec<DirectionArrow> {
    let max_adjustment = state.config.max_heading_adjustment_radians;
    state
        .field
        .cells()
        .filter(|&cell| cell != (state.beam.x, state.beam.y))
        .map(|(x, y)| {
            let correction = heading_correction_or_zero(state.waveforms.cell(x, y), max_adjustment);
            DirectionArrow {
                x,
                y,
                direction_radians: travel_direction(&state.beam, correction),
            }
        })
        .collect()
}

/// Cells where a load would be dropped, empty until a full cycle has been heard at full power
pub fn projected_targets(state: &SimState) -> Vec<(usize, usize)> {
    let config = &state.config;
    let settled_at =
        config.beam_active_delay_secs + config.power_ramp_secs + config.cycle_duration_secs();
    let settled = state.beam_stage.is_transmitting()
        && state.time_secs.is_some_and(|t| t >= settled_at);
    if !settled {
        return Vec::new();
    }

    let max_adjustment = config.max_heading_adjustment_radians;
    state
        .field
        .cells()
        .filter(|&(x, y)| {
            is_near_target(
                state.waveforms.cell(x, y),
                &state.marker,
                max_adjustment,
                x as f64 + 0.5,
                y as f64 + 0.5,
            )
        })
        .collect()
}

/// Signal at the aircraft's cell, `None` if it is somehow outside the field
pub fn signal_at_aircraft(state: &SimState) -> Option<SignalSplit> {
    let (x, y) = state.aircraft.cell(state.field.size())?;
    let total = state.field.read(x, y);
    let interference = state.interference.last_amplitude;
    Some(SignalSplit {
        total,
        interference,
        beam: total - interference,
    })
}
