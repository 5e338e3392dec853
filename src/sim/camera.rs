//! Camera state and viewport projection

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::pose::Ray;

/// Perspective lens parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Snapshot of the viewing camera for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    pub view_projection: Mat4,
}

impl CameraState {
    /// Camera at `position` looking at `target`, Y up
    pub fn look_at(position: Vec3, target: Vec3, lens: Lens) -> Self {
        let forward = (target - position).normalize_or(Vec3::NEG_Z);
        let view = Mat4::look_to_rh(position, forward, Vec3::Y);
        let projection = Mat4::perspective_rh(lens.fov_y, lens.aspect, lens.near, lens.far);
        Self {
            position,
            forward,
            view_projection: projection * view,
        }
    }

    /// Camera at `position` with `rotation` applied to the -Z forward axis
    pub fn from_rotation(position: Vec3, rotation: Quat, lens: Lens) -> Self {
        let forward = rotation * Vec3::NEG_Z;
        Self::look_at(position, position + forward, lens)
    }

    /// Project a world point to normalized viewport coordinates (0..1, origin
    /// bottom-left). `None` when the point is on or behind the camera plane.
    pub fn world_to_viewport(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 || !clip.is_finite() {
            return None;
        }
        let ndc = Vec2::new(clip.x, clip.y) / clip.w;
        Some(ndc * 0.5 + Vec2::splat(0.5))
    }

    /// Pointer ray through normalized viewport coordinates
    pub fn viewport_ray(&self, viewport: Vec2) -> Option<Ray> {
        let inverse = self.view_projection.inverse();
        let ndc = viewport * 2.0 - Vec2::ONE;
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - near)
    }

    /// Pointer ray aimed at a world point
    pub fn ray_towards(&self, point: Vec3) -> Option<Ray> {
        Ray::towards(self.position, point)
    }
}
