//! Acceptance test for displacement targets
//!
//! A haunted prop has to land somewhere the player can actually see it:
//! in front of the camera, inside the viewport margin, not behind a wall.

use glam::Vec3;

use super::camera::CameraState;
use super::occlusion::OcclusionQuery;
use crate::config::VisibilityConfig;

/// Why a candidate point was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BehindCamera,
    OutsideMargin,
    Occluded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityValidator {
    screen_margin: f32,
    occlusion_enabled: bool,
}

impl VisibilityValidator {
    pub fn new(config: &VisibilityConfig) -> Self {
        Self {
            screen_margin: config.screen_margin,
            occlusion_enabled: config.occlusion_enabled,
        }
    }

    pub fn is_acceptable(
        &self,
        point: Vec3,
        camera: Option<&CameraState>,
        occlusion: Option<&dyn OcclusionQuery>,
    ) -> bool {
        self.check(point, camera, occlusion).is_ok()
    }

    /// Same as `is_acceptable` but reports the failed constraint.
    /// Without a camera every point passes so haunting never stalls.
    pub fn check(
        &self,
        point: Vec3,
        camera: Option<&CameraState>,
        occlusion: Option<&dyn OcclusionQuery>,
    ) -> Result<(), Rejection> {
        let Some(camera) = camera else {
            log::debug!("No camera, accepting {point}");
            return Ok(());
        };

        let uv = camera
            .world_to_viewport(point)
            .ok_or(Rejection::BehindCamera)?;
        let lo = self.screen_margin;
        let hi = 1.0 - self.screen_margin;
        if !(lo..=hi).contains(&uv.x) || !(lo..=hi).contains(&uv.y) {
            return Err(Rejection::OutsideMargin);
        }

        if self.occlusion_enabled {
            if let Some(scene) = occlusion {
                let to_point = point - camera.position;
                let distance = to_point.length();
                if scene.raycast(camera.position, to_point, distance) {
                    return Err(Rejection::Occluded);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::camera::Lens;
    use crate::sim::occlusion::{Occluder, OcclusionScene};

    fn camera() -> CameraState {
        CameraState::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Lens::default())
    }

    fn validator(occlusion_enabled: bool) -> VisibilityValidator {
        VisibilityValidator::new(&VisibilityConfig {
            screen_margin: 0.1,
            occlusion_enabled,
        })
    }

    fn wall() -> OcclusionScene {
        OcclusionScene::new(vec![Occluder::Aabb {
            min: Vec3::new(-1.0, -1.0, 4.0),
            max: Vec3::new(1.0, 1.0, 5.0),
        }])
    }

    #[test]
    fn test_no_camera_fails_open() {
        let v = validator(true);
        let scene = wall();
        assert!(v.is_acceptable(Vec3::new(0.0, 0.0, 500.0), None, Some(&scene)));
    }

    #[test]
    fn test_behind_camera() {
        assert_eq!(
            validator(false).check(Vec3::new(0.0, 0.0, 12.0), Some(&camera()), None),
            Err(Rejection::BehindCamera)
        );
    }

    #[test]
    fn test_margin() {
        let v = validator(false);
        let cam = camera();
        assert!(v.is_acceptable(Vec3::ZERO, Some(&cam), None));
        // Far off to the side at the same depth
        assert_eq!(
            v.check(Vec3::new(50.0, 0.0, 0.0), Some(&cam), None),
            Err(Rejection::OutsideMargin)
        );
    }

    #[test]
    fn test_occlusion_toggle() {
        let scene = wall();
        let cam = camera();
        assert_eq!(
            validator(true).check(Vec3::ZERO, Some(&cam), Some(&scene)),
            Err(Rejection::Occluded)
        );
        assert!(validator(false).is_acceptable(Vec3::ZERO, Some(&cam), Some(&scene)));
    }

    #[test]
    fn test_missing_scene_skips_occlusion() {
        assert!(validator(true).is_acceptable(Vec3::ZERO, Some(&camera()), None));
    }
}
