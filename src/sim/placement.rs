//! Bounded random search for a displacement offset

use glam::Vec3;
use rand::Rng;

use super::camera::CameraState;
use super::occlusion::OcclusionQuery;
use super::visibility::VisibilityValidator;
use crate::config::PlacementConfig;

/// Axis-aligned bounds for a random world-space offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetRange {
    pub min: Vec3,
    pub max: Vec3,
}

impl OffsetRange {
    /// Each axis drawn independently and uniformly from `[min, max]`
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
            rng.random_range(self.min.z..=self.max.z),
        )
    }

    pub fn contains(&self, offset: Vec3) -> bool {
        offset.cmpge(self.min).all() && offset.cmple(self.max).all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResolver {
    range: OffsetRange,
    max_attempts: u32,
    constrain_visibility: bool,
}

impl PlacementResolver {
    /// Expects a validated config (non-empty range, at least one attempt)
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            range: OffsetRange {
                min: config.offset_min,
                max: config.offset_max,
            },
            max_attempts: config.max_attempts.max(1),
            constrain_visibility: config.constrain_visibility,
        }
    }

    pub fn range(&self) -> OffsetRange {
        self.range
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// First sampled offset that puts `home` somewhere visible, or `None`
    /// once every attempt is spent. `None` means skip this haunt.
    pub fn resolve(
        &self,
        home: Vec3,
        validator: &VisibilityValidator,
        camera: Option<&CameraState>,
        occlusion: Option<&dyn OcclusionQuery>,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        if !self.constrain_visibility {
            return Some(self.range.sample(rng));
        }
        self.resolve_with(home, rng, |point| {
            let verdict = validator.check(point, camera, occlusion);
            if let Err(reason) = verdict {
                log::debug!("Rejected candidate {point}: {reason:?}");
            }
            verdict.is_ok()
        })
    }

    /// Sampling loop with a caller-supplied acceptance test
    pub fn resolve_with(
        &self,
        home: Vec3,
        rng: &mut impl Rng,
        mut accept: impl FnMut(Vec3) -> bool,
    ) -> Option<Vec3> {
        (0..self.max_attempts).find_map(|_| {
            let offset = self.range.sample(rng);
            accept(home + offset).then_some(offset)
        })
    }
}
