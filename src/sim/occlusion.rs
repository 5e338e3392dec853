//! Line-of-sight queries against scene blockers

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pose::Ray;

/// Ray query against whatever blocks the player's view
pub trait OcclusionQuery {
    /// True if something intersects the ray strictly closer than `max_distance`
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool;
}

impl<F> OcclusionQuery for F
where
    F: Fn(Vec3, Vec3, f32) -> bool,
{
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        self(origin, direction, max_distance)
    }
}

/// Static blocker geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Occluder {
    Sphere { center: Vec3, radius: f32 },
    Aabb { min: Vec3, max: Vec3 },
}

impl Occluder {
    /// Hit distance along `ray`
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Occluder::Sphere { center, radius } => ray.sphere_intersection(center, radius),
            Occluder::Aabb { min, max } => ray.aabb_intersection(min, max),
        }
    }
}

/// Set of blockers (walls, furniture) that can hide a prop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcclusionScene {
    pub occluders: Vec<Occluder>,
}

impl OcclusionScene {
    pub fn new(occluders: Vec<Occluder>) -> Self {
        Self { occluders }
    }

    pub fn push(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }
}

impl OcclusionQuery for OcclusionScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        let Some(ray) = Ray::new(origin, direction) else {
            return false;
        };
        self.occluders
            .iter()
            .filter_map(|o| o.ray_distance(&ray))
            .any(|t| t < max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocker_between_hits() {
        let scene = OcclusionScene::new(vec![Occluder::Aabb {
            min: Vec3::new(-1.0, -1.0, 4.0),
            max: Vec3::new(1.0, 1.0, 5.0),
        }]);
        assert!(scene.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 10.0));
    }

    #[test]
    fn test_blocker_beyond_target_ignored() {
        let scene = OcclusionScene::new(vec![Occluder::Sphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
        }]);
        // Target sits at the origin, sphere surface is 14 units away
        assert!(!scene.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 10.0));
    }

    #[test]
    fn test_hit_at_exact_distance_does_not_block() {
        let scene = OcclusionScene::new(vec![Occluder::Sphere {
            center: Vec3::new(0.0, 0.0, -1.0),
            radius: 1.0,
        }]);
        assert!(!scene.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 10.0));
        assert!(scene.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 10.5));
    }

    #[test]
    fn test_closure_query() {
        let always = |_: Vec3, _: Vec3, _: f32| true;
        assert!(always.raycast(Vec3::ZERO, Vec3::X, 1.0));
    }
}
