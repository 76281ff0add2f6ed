//! Configuration error types

use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while building a simulation session
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config text is not valid JSON for `SimConfig`
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failed to read the config file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Radio field must have at least one cell
    #[error("Field size must be at least 1, got {0}")]
    EmptyField(usize),

    /// Waveform history needs at least one slot
    #[error("Waveform length must be at least 1, got {0}")]
    EmptyWaveform(usize),

    /// A duration, speed or angle that must be strictly positive
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// A value that must be zero or more
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A transmitter or marker placed outside the radio field
    #[error("{name} at ({x}, {y}) is outside the {size}x{size} field")]
    OutOfField {
        name: &'static str,
        x: usize,
        y: usize,
        size: usize,
    },
}
