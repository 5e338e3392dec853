//! Haunted Props - ghost-driven hidden-object puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic haunting and interaction simulation
//! - `config`: Tunables with validation
//! - `level`: Static level layout (props, rooms)
//! - `session`: Match clock and score bookkeeping
//! - `rooms`: Room registry and camera transitions

pub mod config;
pub mod error;
pub mod level;
pub mod rooms;
pub mod session;
pub mod sim;

pub use config::EngineConfig;
pub use error::{ConfigError, LoadError};
pub use level::LevelDefinition;
pub use rooms::RoomRegistry;
pub use session::MatchSession;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Haunt cadence defaults (seconds)
    pub const INITIAL_HAUNT_INTERVAL: f32 = 5.0;
    pub const MIN_HAUNT_INTERVAL: f32 = 2.0;
    pub const HAUNT_INTERVAL_DECREASE: f32 = 0.1;
    pub const MAX_SIMULTANEOUS_HAUNTS: u32 = 3;

    /// Per-axis orientation jitter applied on displacement (degrees)
    pub const ROTATION_JITTER_DEGREES: f32 = 15.0;

    /// Placement sampling defaults
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10;
    pub const SCREEN_MARGIN: f32 = 0.1;

    /// Prop defaults
    pub const DEFAULT_POINTS: u32 = 1;
    pub const DEFAULT_SNAP_TOLERANCE: f32 = 0.1;
    pub const DEFAULT_BOUNDS_RADIUS: f32 = 0.5;

    /// Maximum pointer ray length for hover picking
    pub const PICK_DISTANCE: f32 = 100.0;

    /// Match defaults
    pub const MATCH_DURATION_SECS: f32 = 120.0;
    pub const TARGET_SCORE: u32 = 10;

    /// Camera transition speed (progress per second)
    pub const ROOM_TRANSITION_SPEED: f32 = 2.0;
}

