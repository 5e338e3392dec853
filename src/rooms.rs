//! Room registry and camera transitions
//!
//! Each room has a camera anchor. Switching rooms moves the camera with an
//! explicit interpolation (`progress` in [0, 1]) advanced once per tick.

use glam::{Mat4, Vec3};

use crate::consts::ROOM_TRANSITION_SPEED;
use crate::error::ConfigError;
use crate::level::LevelDefinition;
use crate::sim::camera::{CameraState, Lens};
use crate::sim::pose::Pose;

/// A room and the props that live in it
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub camera: Pose,
    pub prop_names: Vec<String>,
}

/// Camera pose looking from `position` toward `target`, Y up
pub fn look_pose(position: Vec3, target: Vec3) -> Pose {
    let forward = (target - position).normalize_or(Vec3::NEG_Z);
    let view = Mat4::look_to_rh(position, forward, Vec3::Y);
    let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
    Pose::new(position, rotation)
}

/// In-flight camera move between two rooms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub from: Pose,
    pub to: Pose,
    pub progress: f32,
}

impl CameraTransition {
    pub fn current(&self) -> Pose {
        let t = self.progress.clamp(0.0, 1.0);
        Pose::new(
            self.from.position.lerp(self.to.position, t),
            self.from.rotation.slerp(self.to.rotation, t),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }
}

#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: Vec<Room>,
    current: usize,
    camera: Pose,
    transition: Option<CameraTransition>,
    transition_speed: f32,
}

impl RoomRegistry {
    /// Starts in the first room with the camera already at its anchor
    pub fn new(rooms: Vec<Room>) -> Result<Self, ConfigError> {
        let camera = rooms.first().ok_or(ConfigError::NoRooms)?.camera;
        Ok(Self {
            rooms,
            current: 0,
            camera,
            transition: None,
            transition_speed: ROOM_TRANSITION_SPEED,
        })
    }

    /// Rooms from level data, with each prop listed under its room
    pub fn from_level(level: &LevelDefinition) -> Result<Self, ConfigError> {
        level.validate()?;
        let rooms = level
            .rooms
            .iter()
            .map(|def| Room {
                name: def.name.clone(),
                camera: look_pose(def.camera_position, def.camera_target),
                prop_names: level
                    .props_in_room(&def.name)
                    .map(|p| p.name.clone())
                    .collect(),
            })
            .collect();
        Self::new(rooms)
    }

    /// Camera move speed in progress per second. Non-positive or non-finite
    /// speeds would never finish a move and are ignored.
    pub fn with_transition_speed(mut self, speed: f32) -> Self {
        if speed.is_finite() && speed > 0.0 {
            self.transition_speed = speed;
        } else {
            log::warn!("Ignoring room transition speed {speed}");
        }
        self
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_room(&self) -> &Room {
        &self.rooms[self.current]
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Current (possibly mid-transition) camera pose
    pub fn camera_pose(&self) -> Pose {
        self.camera
    }

    pub fn camera_state(&self, lens: Lens) -> CameraState {
        CameraState::from_rotation(self.camera.position, self.camera.rotation, lens)
    }

    /// Every prop across all rooms, room by room
    pub fn all_prop_names(&self) -> Vec<&str> {
        self.rooms
            .iter()
            .flat_map(|r| r.prop_names.iter().map(String::as_str))
            .collect()
    }

    /// Begin moving to room `index`. Ignored when out of range, already
    /// there, or mid-transition.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.rooms.len() || index == self.current || self.transition.is_some() {
            return false;
        }
        self.current = index;
        self.transition = Some(CameraTransition {
            from: self.camera,
            to: self.rooms[index].camera,
            progress: 0.0,
        });
        log::info!("Switching to room {}", self.rooms[index].name);
        true
    }

    pub fn next(&mut self) -> bool {
        self.switch_to((self.current + 1) % self.rooms.len())
    }

    pub fn previous(&mut self) -> bool {
        self.switch_to((self.current + self.rooms.len() - 1) % self.rooms.len())
    }

    /// Advance any camera move
    pub fn tick(&mut self, dt: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.progress += dt * self.transition_speed;
        self.camera = transition.current();
        if transition.is_finished() {
            self.camera = transition.to;
            self.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{PropDefinition, RoomDefinition};

    fn level() -> LevelDefinition {
        let room = |name: &str, x: f32| RoomDefinition {
            name: name.into(),
            camera_position: Vec3::new(x, 2.0, 8.0),
            camera_target: Vec3::new(x, 0.0, 0.0),
        };
        LevelDefinition {
            rooms: vec![room("hall", 0.0), room("study", 20.0), room("attic", 40.0)],
            props: vec![
                PropDefinition::new("lamp", Vec3::ZERO).in_room("hall"),
                PropDefinition::new("globe", Vec3::new(20.0, 0.0, 0.0)).in_room("study"),
                PropDefinition::new("trunk", Vec3::new(40.0, 0.0, 0.0)).in_room("attic"),
            ],
        }
    }

    #[test]
    fn test_look_pose_faces_target() {
        let pose = look_pose(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!((pose.rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Z, 1e-5));
        let pose = look_pose(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0));
        assert!((pose.rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(
            RoomRegistry::new(Vec::new()),
            Err(ConfigError::NoRooms)
        ));
    }

    #[test]
    fn test_membership() {
        let rooms = RoomRegistry::from_level(&level()).unwrap();
        assert_eq!(rooms.all_prop_names(), vec!["lamp", "globe", "trunk"]);
        assert_eq!(rooms.current_room().name, "hall");
    }

    #[test]
    fn test_transition_interpolates() {
        let mut rooms = RoomRegistry::from_level(&level()).unwrap();
        assert!(rooms.switch_to(1));
        // Busy: further switches ignored
        assert!(!rooms.switch_to(2));

        rooms.tick(0.25);
        let mid = rooms.camera_pose().position;
        assert!((mid.x - 10.0).abs() < 1e-4);
        assert!(rooms.is_transitioning());

        rooms.tick(0.25);
        assert!(!rooms.is_transitioning());
        assert_eq!(rooms.camera_pose(), rooms.rooms()[1].camera);
    }

    #[test]
    fn test_switch_guards_and_wrap() {
        let mut rooms = RoomRegistry::from_level(&level()).unwrap();
        assert!(!rooms.switch_to(0));
        assert!(!rooms.switch_to(7));
        assert!(rooms.previous());
        assert_eq!(rooms.current_index(), 2);
        rooms.tick(1.0);
        assert!(rooms.next());
        assert_eq!(rooms.current_index(), 0);
    }

    #[test]
    fn test_bad_transition_speed_ignored() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut rooms = RoomRegistry::from_level(&level())
                .unwrap()
                .with_transition_speed(speed);
            assert!(rooms.switch_to(1));
            rooms.tick(0.5);
            assert!(!rooms.is_transitioning());
            assert!(rooms.switch_to(2));
        }

        let mut rooms = RoomRegistry::from_level(&level())
            .unwrap()
            .with_transition_speed(4.0);
        rooms.switch_to(1);
        rooms.tick(0.25);
        assert!(!rooms.is_transitioning());
    }

    #[test]
    fn test_camera_state_follows_pose() {
        let rooms = RoomRegistry::from_level(&level()).unwrap();
        let cam = rooms.camera_state(Lens::default());
        let uv = cam.world_to_viewport(Vec3::ZERO).unwrap();
        assert!(uv.abs_diff_eq(glam::Vec2::splat(0.5), 1e-4));
    }
}
