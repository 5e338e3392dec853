//! Error taxonomy
//!
//! Only initialization can fail. Everything that happens during a tick is
//! either a valid transition or a silent no-op.

use std::path::PathBuf;

use thiserror::Error;

/// A broken level or engine definition. The engine refuses to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("placement max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("offset range is inverted on the {axis} axis: min {min} > max {max}")]
    InvertedOffsetRange { axis: char, min: f32, max: f32 },
    #[error("screen margin {0} must lie in [0, 0.5)")]
    ScreenMargin(f32),
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("min_interval {min} exceeds initial_interval {initial}")]
    IntervalOrder { min: f32, initial: f32 },
    #[error("decrease_rate must not be negative, got {0}")]
    NegativeDecreaseRate(f32),
    #[error("max_simultaneous_displaced must be at least 1")]
    ZeroDisplacementCap,
    #[error("prop '{name}': snap tolerance {value} must be a non-negative finite distance")]
    SnapTolerance { name: String, value: f32 },
    #[error("prop '{name}': points value must be positive")]
    ZeroPoints { name: String },
    #[error("prop '{name}': bounds radius {value} must be positive")]
    BoundsRadius { name: String, value: f32 },
    #[error("prop name '{0}' is declared more than once")]
    DuplicateProp(String),
    #[error("prop '{prop}' references unknown room '{room}'")]
    UnknownRoom { prop: String, room: String },
    #[error("room registry needs at least one room")]
    NoRooms,
}

/// Failure to read a config or level file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = ConfigError::InvertedOffsetRange {
            axis: 'y',
            min: 1.0,
            max: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "offset range is inverted on the y axis: min 1 > max 0"
        );

        let err: LoadError = ConfigError::ZeroAttempts.into();
        assert_eq!(err.to_string(), "placement max_attempts must be at least 1");
    }
}
