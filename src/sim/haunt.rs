//! Adaptive haunt scheduler
//!
//! Counts down while play is active. On expiry it picks one correctly placed
//! prop, asks the placement resolver for a visible offset, and moves it. The
//! timer resets whether or not anything moved, then the interval tightens.

use glam::Quat;
use rand::Rng;

use super::camera::CameraState;
use super::entity::{EntityId, InteractableEntity};
use super::occlusion::OcclusionQuery;
use super::placement::PlacementResolver;
use super::visibility::VisibilityValidator;
use crate::config::HauntConfig;

/// Scheduler phase for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Play inactive, timer frozen
    Idle,
    CountingDown,
    /// Running a haunt cycle this tick
    Firing,
}

/// Why a haunt cycle moved nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Every prop is already out of place (or there are none)
    NoEligible,
    CapReached,
    /// No visible offset found within the attempt budget
    NoPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HauntOutcome {
    Displaced(EntityId),
    Skipped(SkipReason),
}

/// Services a haunt cycle needs for placement
#[derive(Clone, Copy)]
pub struct PlacementContext<'a> {
    pub resolver: &'a PlacementResolver,
    pub validator: &'a VisibilityValidator,
    pub camera: Option<&'a CameraState>,
    pub occlusion: Option<&'a dyn OcclusionQuery>,
}

#[derive(Debug, Clone)]
pub struct HauntScheduler {
    initial_interval: f32,
    min_interval: f32,
    decrease_rate: f32,
    increase_difficulty: bool,
    max_simultaneous_displaced: usize,
    jitter_radians: f32,
    interval: f32,
    timer: f32,
    phase: SchedulerPhase,
}

impl HauntScheduler {
    /// Expects a validated config
    pub fn new(config: &HauntConfig) -> Self {
        Self {
            initial_interval: config.initial_interval,
            min_interval: config.min_interval,
            decrease_rate: config.decrease_rate,
            increase_difficulty: config.increase_difficulty,
            max_simultaneous_displaced: config.max_simultaneous_displaced as usize,
            jitter_radians: config.rotation_jitter_degrees.to_radians(),
            interval: config.initial_interval,
            timer: config.initial_interval,
            phase: SchedulerPhase::Idle,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn initial_interval(&self) -> f32 {
        self.initial_interval
    }

    pub fn min_interval(&self) -> f32 {
        self.min_interval
    }

    /// Advance by `dt`. Returns the cycle outcome on ticks where the timer expired.
    pub fn tick(
        &mut self,
        dt: f32,
        play_active: bool,
        entities: &mut [InteractableEntity],
        placement: PlacementContext<'_>,
        rng: &mut impl Rng,
    ) -> Option<HauntOutcome> {
        if !play_active {
            self.phase = SchedulerPhase::Idle;
            return None;
        }
        self.phase = SchedulerPhase::CountingDown;
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }

        self.phase = SchedulerPhase::Firing;
        let outcome = self.haunt_now(entities, placement, rng);
        self.reset_timer();
        self.phase = SchedulerPhase::CountingDown;
        Some(outcome)
    }

    /// One selection + placement cycle, leaving timer and interval alone
    pub fn haunt_now(
        &self,
        entities: &mut [InteractableEntity],
        placement: PlacementContext<'_>,
        rng: &mut impl Rng,
    ) -> HauntOutcome {
        let eligible: Vec<usize> = entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_correct())
            .map(|(i, _)| i)
            .collect();
        let displaced = entities.len() - eligible.len();

        if eligible.is_empty() {
            log::info!("No props to haunt, all are already moved");
            return HauntOutcome::Skipped(SkipReason::NoEligible);
        }
        if displaced >= self.max_simultaneous_displaced {
            log::info!("Max simultaneous haunts reached ({displaced})");
            return HauntOutcome::Skipped(SkipReason::CapReached);
        }

        let target = &mut entities[eligible[rng.random_range(0..eligible.len())]];
        let Some(offset) = placement.resolver.resolve(
            target.home_pose().position,
            placement.validator,
            placement.camera,
            placement.occlusion,
            rng,
        ) else {
            log::info!(
                "No visible spot for {} after {} attempts",
                target.name(),
                placement.resolver.max_attempts()
            );
            return HauntOutcome::Skipped(SkipReason::NoPlacement);
        };

        let jitter = self.sample_jitter(rng);
        if target.apply_displacement(offset, jitter) {
            log::info!("Ghost moved {}!", target.name());
            HauntOutcome::Displaced(target.id())
        } else {
            HauntOutcome::Skipped(SkipReason::NoPlacement)
        }
    }

    fn sample_jitter(&self, rng: &mut impl Rng) -> Quat {
        let j = self.jitter_radians;
        if j == 0.0 {
            return Quat::IDENTITY;
        }
        Quat::from_euler(
            glam::EulerRot::XYZ,
            rng.random_range(-j..=j),
            rng.random_range(-j..=j),
            rng.random_range(-j..=j),
        )
    }

    fn reset_timer(&mut self) {
        self.timer = self.interval;
        if self.increase_difficulty {
            self.interval = (self.interval - self.decrease_rate).max(self.min_interval);
        }
    }
}
