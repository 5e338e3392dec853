//! Deterministic haunting and interaction simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry declaration order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod entity;
pub mod haunt;
pub mod interaction;
pub mod occlusion;
pub mod placement;
pub mod pose;
pub mod state;
pub mod tick;
pub mod visibility;

pub use camera::{CameraState, Lens};
pub use entity::{CorrectnessResult, EntityId, EntityState, InteractableEntity, Styling};
pub use haunt::{HauntOutcome, HauntScheduler, PlacementContext, SchedulerPhase, SkipReason};
pub use interaction::{InteractionController, InteractionEvent, PointerInput};
pub use occlusion::{Occluder, OcclusionQuery, OcclusionScene};
pub use placement::{OffsetRange, PlacementResolver};
pub use pose::{Pose, Ray};
pub use state::{EngineEvent, HauntEngine, RngState};
pub use tick::{ScoreSink, TickInput, tick};
pub use visibility::{Rejection, VisibilityValidator};
