//! Interactable props
//!
//! A prop starts at its home pose. The ghost moves it somewhere wrong, the
//! player drags it back. Every transition is a pure function of the current
//! state; attempts that make no sense in the current state are no-ops.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::pose::{Pose, Ray};
use crate::error::ConfigError;

/// Stable prop identifier (index into the engine registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Placement state of a prop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    /// At the home pose
    Correct,
    /// Moved by the ghost, not being held
    Displaced,
    /// Held by the player (only reachable from `Displaced`)
    Dragging,
}

/// Outcome of releasing a prop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectnessResult {
    /// Nothing was being dragged
    Unchanged,
    /// Snapped home, worth this many points
    Corrected(u32),
    /// Released too far from home
    StillWrong,
}

/// Visual treatment derived from state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Styling {
    /// Prop's own material
    Default,
    /// Out-of-place tint
    Wrong,
    /// Hover/drag tint
    Highlight,
}

/// A prop the ghost can move and the player can put back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractableEntity {
    id: EntityId,
    name: String,
    home: Pose,
    current: Pose,
    state: EntityState,
    points_value: u32,
    snap_tolerance: f32,
    /// Pick sphere radius around the current position
    bounds_radius: f32,
    hovered: bool,
}

impl InteractableEntity {
    /// Capture `pose` as the home pose. Fails on a broken prop definition.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        pose: Pose,
        points_value: u32,
        snap_tolerance: f32,
        bounds_radius: f32,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if points_value == 0 {
            return Err(ConfigError::ZeroPoints { name });
        }
        if !snap_tolerance.is_finite() || snap_tolerance < 0.0 {
            return Err(ConfigError::SnapTolerance {
                name,
                value: snap_tolerance,
            });
        }
        if !bounds_radius.is_finite() || bounds_radius <= 0.0 {
            return Err(ConfigError::BoundsRadius {
                name,
                value: bounds_radius,
            });
        }
        if !pose.is_finite() {
            return Err(ConfigError::NonFinite { field: "pose" });
        }
        Ok(Self {
            id,
            name,
            home: pose,
            current: pose,
            state: EntityState::Correct,
            points_value,
            snap_tolerance,
            bounds_radius,
            hovered: false,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home_pose(&self) -> Pose {
        self.home
    }

    pub fn current_pose(&self) -> Pose {
        self.current
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn points_value(&self) -> u32 {
        self.points_value
    }

    pub fn snap_tolerance(&self) -> f32 {
        self.snap_tolerance
    }

    pub fn bounds_radius(&self) -> f32 {
        self.bounds_radius
    }

    pub fn is_correct(&self) -> bool {
        self.state == EntityState::Correct
    }

    /// Move away from home by `offset`, with `jitter` applied on top of the
    /// home orientation. Only a correctly placed prop can be moved.
    pub fn apply_displacement(&mut self, offset: Vec3, jitter: Quat) -> bool {
        if self.state != EntityState::Correct {
            return false;
        }
        let target = Pose::new(self.home.position + offset, self.home.rotation * jitter);
        if !target.is_finite() {
            log::warn!("Discarded non-finite displacement for {}", self.name);
            return false;
        }
        self.current = target;
        self.state = EntityState::Displaced;
        true
    }

    /// Pointer entered. Correct props keep their default look.
    pub fn begin_hover(&mut self) {
        if self.state != EntityState::Correct {
            self.hovered = true;
        }
    }

    /// Pointer left. Ignored mid-drag so the drag highlight stays put.
    pub fn end_hover(&mut self) {
        if self.state != EntityState::Dragging {
            self.hovered = false;
        }
    }

    pub fn begin_drag(&mut self) -> bool {
        if self.state != EntityState::Displaced {
            return false;
        }
        self.state = EntityState::Dragging;
        true
    }

    /// Slide the prop along the camera-facing plane through its position
    pub fn update_drag(&mut self, pointer_ray: &Ray, camera_forward: Vec3) {
        if self.state != EntityState::Dragging {
            return;
        }
        let Some(t) = pointer_ray.plane_intersection(self.current.position, camera_forward)
        else {
            return;
        };
        let point = pointer_ray.at(t);
        if !point.is_finite() {
            log::warn!("Discarded non-finite drag point for {}", self.name);
            return;
        }
        self.current.position = point;
    }

    /// Release: snap home if close enough, otherwise stay displaced
    pub fn end_drag(&mut self) -> CorrectnessResult {
        if self.state != EntityState::Dragging {
            return CorrectnessResult::Unchanged;
        }
        self.hovered = false;
        let distance = self.current.position.distance(self.home.position);
        if distance <= self.snap_tolerance {
            self.current = self.home;
            self.state = EntityState::Correct;
            CorrectnessResult::Corrected(self.points_value)
        } else {
            self.state = EntityState::Displaced;
            CorrectnessResult::StillWrong
        }
    }

    /// Current visual treatment, derived from state alone
    pub fn styling(&self) -> Styling {
        match self.state {
            EntityState::Correct => Styling::Default,
            EntityState::Dragging => Styling::Highlight,
            EntityState::Displaced if self.hovered => Styling::Highlight,
            EntityState::Displaced => Styling::Wrong,
        }
    }

    /// Ray hit distance against the pick sphere
    pub fn pick_distance(&self, ray: &Ray) -> Option<f32> {
        ray.sphere_intersection(self.current.position, self.bounds_radius)
    }
}
