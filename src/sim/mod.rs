//! Deterministic simulation module
//!
//! All beam, receiver and aircraft logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, timestamps derived from the step count
//! - Stable iteration order (column-major over the grid)
//! - No rendering, audio or platform dependencies

pub mod aircraft;
pub mod clock;
pub mod field;
pub mod guidance;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod transmitter;
pub mod waveform;

pub use aircraft::{Aircraft, Drift, PassOutcome, RespawnReason};
pub use clock::SimClock;
pub use field::RadioField;
pub use guidance::{heading_correction, is_near_target, steering_correction, travel_direction};
pub use session::Simulation;
pub use snapshot::{DirectionArrow, SignalSplit, Snapshot};
pub use state::{BeamStage, SimEvent, SimState};
pub use tick::{TickInput, tick};
pub use transmitter::{BeamTransmitter, InterferenceTransmitter, TargetMarker, beam_response};
pub use waveform::WaveformHistory;
