//! Error types for arena generation and round state.

use thiserror::Error;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Top-level error type for all arena errors.
///
/// Every variant is a caller contract violation: bad parameters or a world
/// that cannot satisfy the request. None of them are transient.
#[derive(Debug, Error, PartialEq)]
pub enum ArenaError {
    /// Map dimensions must be odd and at least 3.
    #[error("Invalid map dimensions {width}x{height}: both must be odd and at least 3")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Obstacle ratio outside `[0, 1]`.
    #[error("Invalid obstacle ratio {0}: must be within [0, 1]")]
    InvalidObstacleRatio(f64),

    /// A tuning value that must be a probability or a non-negative rate.
    #[error("Invalid value for {name}: {value}")]
    InvalidProbability {
        /// Name of the setting.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// More cells were requested than there are potential spawn locations.
    #[error("Cannot sample {requested} spawn locations, only {available} available")]
    InsufficientSpawnLocations {
        /// Number of cells requested.
        requested: usize,
        /// Number of candidate cells.
        available: usize,
    },

    /// No habitable, empty cell remains.
    #[error("No potential spawn location available")]
    NoSpawnLocation,

    /// Settings text failed to parse.
    #[error("Failed to parse settings: {0}")]
    SettingsParse(String),

    /// Settings could not be written out as RON.
    #[error("Failed to serialize settings: {0}")]
    SettingsSerialize(String),
}
