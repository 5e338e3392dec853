//! Per-frame engine tick
//!
//! Pointer interaction runs first, haunting second, so a prop the player
//! grabbed this frame is already out of the scheduler's reach.

use super::camera::CameraState;
use super::haunt::PlacementContext;
use super::interaction::{InteractionEvent, PointerInput};
use super::occlusion::OcclusionQuery;
use super::state::{EngineEvent, HauntEngine};

/// Host-provided inputs for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Match is running (not paused, not over)
    pub play_active: bool,
    /// Viewing camera, `None` if not assigned yet
    pub camera: Option<CameraState>,
    pub pointer: PointerInput,
}

/// Receives points for every prop put back in place
pub trait ScoreSink {
    fn report_score(&mut self, points: u32);
}

impl<F> ScoreSink for F
where
    F: FnMut(u32),
{
    fn report_score(&mut self, points: u32) {
        self(points)
    }
}

impl ScoreSink for Vec<u32> {
    fn report_score(&mut self, points: u32) {
        self.push(points);
    }
}

/// Advance the engine by one fixed timestep
pub fn tick(
    engine: &mut HauntEngine,
    input: &TickInput,
    occlusion: Option<&dyn OcclusionQuery>,
    score: &mut dyn ScoreSink,
    dt: f32,
) {
    if input.play_active {
        engine.time_ticks += 1;
    }

    let mut interactions = Vec::new();
    engine.controller.tick(
        &input.pointer,
        input.play_active,
        input.camera.map(|c| c.forward),
        &mut engine.entities,
        &mut interactions,
    );
    for event in interactions {
        engine.events.push(match event {
            InteractionEvent::DragStarted(id) => EngineEvent::DragStarted(id),
            InteractionEvent::Fixed { id, points } => {
                score.report_score(points);
                EngineEvent::Fixed { id, points }
            }
            InteractionEvent::DropMissed(id) => EngineEvent::DropMissed(id),
        });
    }

    let placement = PlacementContext {
        resolver: &engine.resolver,
        validator: &engine.validator,
        camera: input.camera.as_ref(),
        occlusion,
    };
    if let Some(outcome) = engine.scheduler.tick(
        dt,
        input.play_active,
        &mut engine.entities,
        placement,
        &mut engine.rng,
    ) {
        engine.record_haunt(outcome);
    }
}
