//! Engine state
//!
//! The prop registry plus the services that act on it. Props are created at
//! level load and live until the engine is dropped.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraState;
use super::entity::{EntityId, InteractableEntity};
use super::haunt::{HauntOutcome, HauntScheduler, PlacementContext, SkipReason};
use super::interaction::InteractionController;
use super::occlusion::OcclusionQuery;
use super::placement::PlacementResolver;
use super::pose::Pose;
use super::visibility::VisibilityValidator;
use crate::config::{EngineConfig, Palette};
use crate::error::ConfigError;
use crate::level::LevelDefinition;

/// Something the host may want to react to (sound, UI, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Haunted(EntityId),
    HauntSkipped(SkipReason),
    DragStarted(EntityId),
    Fixed { id: EntityId, points: u32 },
    DropMissed(EntityId),
}

/// RNG seed record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete haunting and interaction state for one level
#[derive(Debug)]
pub struct HauntEngine {
    pub(crate) config: EngineConfig,
    pub(crate) rng_state: RngState,
    pub(crate) rng: Pcg32,
    /// Props in declaration order, `EntityId(n)` lives at index `n`
    pub(crate) entities: Vec<InteractableEntity>,
    pub(crate) scheduler: HauntScheduler,
    pub(crate) controller: InteractionController,
    pub(crate) resolver: PlacementResolver,
    pub(crate) validator: VisibilityValidator,
    pub(crate) events: Vec<EngineEvent>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
}

impl HauntEngine {
    /// Engine with an empty registry. Refuses a broken config.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng_state = RngState::new(config.seed);
        Ok(Self {
            rng: rng_state.to_rng(),
            rng_state,
            entities: Vec::new(),
            scheduler: HauntScheduler::new(&config.haunt),
            controller: InteractionController::new(&config.interaction),
            resolver: PlacementResolver::new(&config.placement),
            validator: VisibilityValidator::new(&config.visibility),
            events: Vec::new(),
            time_ticks: 0,
            config,
        })
    }

    /// Engine with every prop of `level` registered
    pub fn from_level(config: EngineConfig, level: &LevelDefinition) -> Result<Self, ConfigError> {
        level.validate()?;
        let mut engine = Self::new(config)?;
        for prop in &level.props {
            engine.spawn_prop(
                &prop.name,
                Pose::new(prop.position, prop.rotation),
                prop.points_value,
                prop.snap_tolerance,
                prop.bounds_radius,
            )?;
        }
        log::info!("Haunt engine found {} interactable props", engine.entities.len());
        Ok(engine)
    }

    /// Register a prop at its home pose
    pub fn spawn_prop(
        &mut self,
        name: &str,
        pose: Pose,
        points_value: u32,
        snap_tolerance: f32,
        bounds_radius: f32,
    ) -> Result<EntityId, ConfigError> {
        if self.entities.iter().any(|e| e.name() == name) {
            return Err(ConfigError::DuplicateProp(name.to_string()));
        }
        let id = EntityId(self.entities.len() as u32);
        let entity =
            InteractableEntity::new(id, name, pose, points_value, snap_tolerance, bounds_radius)?;
        self.entities.push(entity);
        Ok(id)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn entities(&self) -> &[InteractableEntity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&InteractableEntity> {
        self.entities.get(id.0 as usize)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&InteractableEntity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Mutable access for hosts that drive transitions directly
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut InteractableEntity> {
        self.entities.get_mut(id.0 as usize)
    }

    pub fn scheduler(&self) -> &HauntScheduler {
        &self.scheduler
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Props currently out of place (displaced or held)
    pub fn displaced_count(&self) -> usize {
        self.entities.iter().filter(|e| !e.is_correct()).count()
    }

    /// Run a haunt cycle right away, leaving the timer alone
    pub fn haunt_now(
        &mut self,
        camera: Option<&CameraState>,
        occlusion: Option<&dyn OcclusionQuery>,
    ) -> HauntOutcome {
        let placement = PlacementContext {
            resolver: &self.resolver,
            validator: &self.validator,
            camera,
            occlusion,
        };
        let outcome = self
            .scheduler
            .haunt_now(&mut self.entities, placement, &mut self.rng);
        self.record_haunt(outcome);
        outcome
    }

    pub(crate) fn record_haunt(&mut self, outcome: HauntOutcome) {
        self.events.push(match outcome {
            HauntOutcome::Displaced(id) => EngineEvent::Haunted(id),
            HauntOutcome::Skipped(reason) => EngineEvent::HauntSkipped(reason),
        });
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}
