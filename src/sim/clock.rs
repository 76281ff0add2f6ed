//! Fixed timestep scheduling, independent of any timer API
//!
//! The host reports how much real time has passed; the clock answers with the
//! world timestamps that must be simulated to catch up. Nothing is ever skipped.

use serde::{Deserialize, Serialize};

/// Schedules steps at `k * time_step` for k = 0, 1, 2, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    time_step_secs: f64,
    /// Steps handed out so far
    steps: u64,
}

impl SimClock {
    /// `time_step_secs` must be positive (checked by config validation)
    pub fn new(time_step_secs: f64) -> Self {
        debug_assert!(time_step_secs > 0.0);
        Self {
            time_step_secs,
            steps: 0,
        }
    }

    pub fn time_step_secs(&self) -> f64 {
        self.time_step_secs
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// World time of the next step to run
    pub fn next_scheduled(&self) -> f64 {
        self.steps as f64 * self.time_step_secs
    }

    /// World time of the most recent step, `None` before the first
    pub fn last_simulated(&self) -> Option<f64> {
        self.steps
            .checked_sub(1)
            .map(|k| k as f64 * self.time_step_secs)
    }

    /// Timestamps to simulate so that the schedule reaches `elapsed_secs`
    ///
    /// Yields until the next scheduled time is at or past `elapsed_secs`. A step
    /// counts as done once it has been yielded. Going backwards in time yields nothing.
    pub fn advance(&mut self, elapsed_secs: f64) -> impl Iterator<Item = f64> + '_ {
        std::iter::from_fn(move || {
            let next = self.next_scheduled();
            if next >= elapsed_secs || !elapsed_secs.is_finite() {
                return None;
            }
            self.steps += 1;
            Some(next)
        })
    }
}
