//! Fixed timestep simulation step
//!
//! One step, in order: controls, field reset, beam timeline, transmitters,
//! waveform sampling, aircraft.

use super::aircraft::PassOutcome;
use super::state::{BeamStage, SimEvent, SimState, power_factor_at};
use super::transmitter::InterferenceTransmitter;

/// External controls for a single step (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Interference transmitter switched on
    pub interference_enabled: bool,
    /// Interference amplitude during the beam's dot, clamped to the configured max
    pub interference_dot: f64,
    /// Interference amplitude during the beam's dash, clamped to the configured max
    pub interference_dash: f64,
    /// Turn the wind around (one-shot)
    pub flip_drift: bool,
}

/// Advance the session by one step at world time `t`
pub fn tick(state: &mut SimState, input: &TickInput, t: f64) {
    apply_input(state, input);

    state.field.reset();
    update_timeline(state, t);

    // The dot/dash cycle starts when the beam goes live
    let keying_time = t - state.config.beam_active_delay_secs;
    state.beam.step(&mut state.field, keying_time);
    state.interference.step(&mut state.field, &state.beam);
    state.waveforms.update(&state.field, &state.beam);

    if state.beam_stage.is_transmitting() {
        fly(state);
    }

    state.time_secs = Some(t);
    state.ticks += 1;
}

fn apply_input(state: &mut SimState, input: &TickInput) {
    let max = state.config.interference_max;
    state.interference_enabled = input.interference_enabled;
    if input.interference_enabled {
        state.interference.dot_amplitude =
            InterferenceTransmitter::clamp_amplitude(input.interference_dot, max);
        state.interference.dash_amplitude =
            InterferenceTransmitter::clamp_amplitude(input.interference_dash, max);
    } else {
        state.interference.dot_amplitude = 0.0;
        state.interference.dash_amplitude = 0.0;
    }

    if input.flip_drift {
        state.drift.flip();
        let direction_radians = state.drift.direction_radians;
        state.emit(SimEvent::DriftFlipped { direction_radians });
    }
}

fn update_timeline(state: &mut SimState, t: f64) {
    let previous = state.beam_stage;
    let stage = BeamStage::at(t, &state.config);
    state.beam_stage = stage;
    state.beam.power_factor = power_factor_at(t, &state.config);

    if stage.is_visible() && !previous.is_visible() {
        state.emit(SimEvent::BeamVisible);
    }
    if stage.is_transmitting() && !previous.is_transmitting() {
        state.emit(SimEvent::BeamActive);
    }

    let marker_visible = t >= state.config.marker_appear_delay_secs;
    if marker_visible && !state.marker_visible {
        state.emit(SimEvent::TargetMarkerVisible);
    }
    state.marker_visible = marker_visible;
}

fn fly(state: &mut SimState) {
    let dt = state.time_step_secs();
    let max_adjustment = state.config.max_heading_adjustment_radians;

    let outcome = match state
        .aircraft
        .step(dt, &state.waveforms, &state.beam, &state.drift, max_adjustment)
    {
        // Replaced before moving: the new aircraft waits at its entry point
        Some(reason) => PassOutcome {
            respawned: Some(reason),
            load_dropped: false,
        },
        None => state
            .aircraft
            .evaluate_pass(&state.waveforms, &state.marker, max_adjustment),
    };

    let pos = state.aircraft.pos;
    if let Some(reason) = outcome.respawned {
        state.emit(SimEvent::AircraftRespawned {
            reason,
            x: pos.x,
            y: pos.y,
        });
    }
    if outcome.load_dropped {
        state.emit(SimEvent::LoadDropped { x: pos.x, y: pos.y });
    }
}
