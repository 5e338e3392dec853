//! Static level layout
//!
//! Home poses and room membership, supplied once at load time.

use std::collections::HashSet;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, LoadError};

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

fn default_snap_tolerance() -> f32 {
    DEFAULT_SNAP_TOLERANCE
}

fn default_bounds_radius() -> f32 {
    DEFAULT_BOUNDS_RADIUS
}

/// One movable prop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropDefinition {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_rotation")]
    pub rotation: Quat,
    #[serde(default = "default_points")]
    pub points_value: u32,
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f32,
    #[serde(default = "default_bounds_radius")]
    pub bounds_radius: f32,
    /// Room this prop belongs to
    #[serde(default)]
    pub room: Option<String>,
}

impl PropDefinition {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            points_value: DEFAULT_POINTS,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            bounds_radius: DEFAULT_BOUNDS_RADIUS,
            room: None,
        }
    }

    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }
}

/// Camera anchor for a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDefinition {
    pub name: String,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub rooms: Vec<RoomDefinition>,
    pub props: Vec<PropDefinition>,
}

impl LevelDefinition {
    /// Names unique, rooms referenced by props exist. Per-prop values are
    /// checked when the prop is instantiated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for prop in &self.props {
            if !seen.insert(prop.name.as_str()) {
                return Err(ConfigError::DuplicateProp(prop.name.clone()));
            }
            if let Some(room) = &prop.room {
                if !self.rooms.iter().any(|r| &r.name == room) {
                    return Err(ConfigError::UnknownRoom {
                        prop: prop.name.clone(),
                        room: room.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Props belonging to `room`, in declaration order
    pub fn props_in_room<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a PropDefinition> {
        self.props
            .iter()
            .filter(move |p| p.room.as_deref() == Some(room))
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json_str(&json)?;
        log::info!(
            "Loaded level {} ({} props, {} rooms)",
            path.display(),
            level.props.len(),
            level.rooms.len()
        );
        Ok(level)
    }
}
