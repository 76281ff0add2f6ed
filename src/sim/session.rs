//! One running simulation: state, clock and the controls the host has set
//!
//! Hosts call `advance` from their timer with the real time since start, then
//! read a `Snapshot`. Control changes take effect at the next step.

use super::clock::SimClock;
use super::snapshot::Snapshot;
use super::state::{SimEvent, SimState};
use super::tick::{TickInput, tick};
use super::transmitter::InterferenceTransmitter;
use crate::error::ConfigResult;
use crate::settings::SimConfig;

/// A simulation session
#[derive(Debug, Clone)]
pub struct Simulation {
    state: SimState,
    clock: SimClock,
    input: TickInput,
}

impl Simulation {
    pub fn new(config: SimConfig) -> ConfigResult<Self> {
        let state = SimState::new(config)?;
        let clock = SimClock::new(state.time_step_secs());
        log::info!(
            "Simulation started: {}x{} field, step {}s",
            state.config.field_size,
            state.config.field_size,
            clock.time_step_secs()
        );
        Ok(Self {
            state,
            clock,
            input: TickInput::default(),
        })
    }

    /// Catch up to `elapsed_secs` of real time. Returns the most recent simulated
    /// timestamp, `None` if nothing has been simulated yet.
    pub fn advance(&mut self, elapsed_secs: f64) -> Option<f64> {
        let mut steps = 0;
        for t in self.clock.advance(elapsed_secs) {
            tick(&mut self.state, &self.input, t);
            // Clear one-shot inputs after processing
            self.input.flip_drift = false;
            steps += 1;
        }
        if steps > 1 {
            log::debug!("Caught up {steps} steps to t={elapsed_secs:.3}");
        }
        self.clock.last_simulated()
    }

    /// Set the interference dials, clamped to [0, interference_max]
    pub fn set_interference(&mut self, dot_amplitude: f64, dash_amplitude: f64) {
        let max = self.state.config.interference_max;
        let clamp = |name: &str, value: f64| {
            if !(0.0..=max).contains(&value) {
                log::warn!("Interference {name} amplitude {value} clamped to [0, {max}]");
            }
            InterferenceTransmitter::clamp_amplitude(value, max)
        };
        self.input.interference_dot = clamp("dot", dot_amplitude);
        self.input.interference_dash = clamp("dash", dash_amplitude);
    }

    pub fn set_interference_enabled(&mut self, enabled: bool) {
        self.input.interference_enabled = enabled;
    }

    /// Turn the wind around at the next step
    pub fn flip_drift(&mut self) {
        self.input.flip_drift = true;
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Events from all steps since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_new_rejects_bad_config() {
        let config = SimConfig {
            dot_duration_secs: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_advance_runs_due_steps() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.advance(0.0), None);
        assert_eq!(sim.advance(1.1), Some(1.0));
        assert_eq!(sim.state().ticks, 5);
        assert_eq!(sim.state().time_secs, Some(1.0));
    }

    #[test]
    fn test_flip_drift_is_one_shot() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let before = sim.state().drift.direction_radians;
        sim.flip_drift();
        sim.advance(1.0);
        assert!(!sim.input().flip_drift);

        let flipped = sim.state().drift.direction_radians;
        assert_ne!(flipped, before);
        sim.advance(2.0);
        assert_eq!(sim.state().drift.direction_radians, flipped);

        let flips = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::DriftFlipped { .. }))
            .count();
        assert_eq!(flips, 1);
    }

    #[test]
    fn test_interference_dials_clamped() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.set_interference(0.9, -0.2);
        assert_eq!(sim.input().interference_dot, 0.5);
        assert_eq!(sim.input().interference_dash, 0.0);

        sim.set_interference(0.1, f64::NAN);
        assert_eq!(sim.input().interference_dash, 0.0);
    }

    #[test]
    fn test_interference_needs_enabling() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.set_interference(0.3, 0.3);
        sim.advance(1.0);
        assert_eq!(sim.state().interference.last_amplitude, 0.0);

        sim.set_interference_enabled(true);
        sim.advance(2.0);
        assert_eq!(sim.state().interference.last_amplitude, 0.3);
        assert!(sim.snapshot().interference.enabled);
    }
}
