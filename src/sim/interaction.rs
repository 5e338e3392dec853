//! Pointer-driven hover and drag
//!
//! Pulled once per tick: the controller reads the pointer ray and button
//! state, works out which prop is under the pointer, and drives that prop's
//! hover/drag transitions.

use glam::Vec3;

use super::entity::{CorrectnessResult, EntityId, InteractableEntity};
use super::pose::Ray;
use crate::config::InteractionConfig;

/// Pointer state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// `None` when there is no pointer this tick (focus lost, device gone)
    pub ray: Option<Ray>,
    /// Primary button held
    pub pressed: bool,
    /// Primary button went down this tick
    pub just_pressed: bool,
    /// Primary button went up this tick
    pub just_released: bool,
}

/// What the controller did to a prop this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    DragStarted(EntityId),
    /// Released close enough to home
    Fixed { id: EntityId, points: u32 },
    /// Released too far from home
    DropMissed(EntityId),
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    pick_distance: f32,
    hovered: Option<usize>,
    dragging: Option<usize>,
}

impl InteractionController {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            pick_distance: config.pick_distance,
            hovered: None,
            dragging: None,
        }
    }

    /// Registry index of the prop under the pointer
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Registry index of the prop being dragged
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Nearest prop whose pick sphere the ray hits within range
    pub fn pick(&self, ray: &Ray, entities: &[InteractableEntity]) -> Option<usize> {
        entities
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.pick_distance(ray).map(|t| (i, t)))
            .filter(|&(_, t)| t <= self.pick_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Apply one tick of pointer input. Does nothing while play is inactive,
    /// which freezes any drag at its last pose until play resumes.
    pub fn tick(
        &mut self,
        pointer: &PointerInput,
        play_active: bool,
        camera_forward: Option<Vec3>,
        entities: &mut [InteractableEntity],
        out: &mut Vec<InteractionEvent>,
    ) {
        if !play_active {
            return;
        }

        // Indices from a previous registry shape are stale
        if self.hovered.is_some_and(|i| i >= entities.len()) {
            self.hovered = None;
        }
        if self.dragging.is_some_and(|i| i >= entities.len()) {
            self.dragging = None;
        }

        self.update_hover(pointer.ray, entities);

        if pointer.just_pressed && self.dragging.is_none() {
            if let Some(index) = self.hovered {
                let prop = &mut entities[index];
                if prop.begin_drag() {
                    self.dragging = Some(index);
                    out.push(InteractionEvent::DragStarted(prop.id()));
                }
            }
        }

        if let Some(index) = self.dragging {
            // Without a ray or a held button the drag is suspended, not ended
            if pointer.pressed {
                if let (Some(ray), Some(forward)) = (pointer.ray, camera_forward) {
                    entities[index].update_drag(&ray, forward);
                }
            }

            if pointer.just_released {
                self.dragging = None;
                let prop = &mut entities[index];
                match prop.end_drag() {
                    CorrectnessResult::Corrected(points) => {
                        log::info!("Fixed {}!", prop.name());
                        out.push(InteractionEvent::Fixed {
                            id: prop.id(),
                            points,
                        });
                    }
                    CorrectnessResult::StillWrong => {
                        out.push(InteractionEvent::DropMissed(prop.id()));
                    }
                    CorrectnessResult::Unchanged => {}
                }
            }
        }
    }

    fn update_hover(&mut self, ray: Option<Ray>, entities: &mut [InteractableEntity]) {
        let hit = ray.and_then(|ray| self.pick(&ray, entities));
        if hit != self.hovered {
            if let Some(previous) = self.hovered {
                entities[previous].end_hover();
            }
            self.hovered = hit;
        }
        // Re-entered every tick so a prop haunted under the pointer lights up
        if let Some(current) = hit {
            entities[current].begin_hover();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityState, Styling};
    use crate::sim::pose::Pose;
    use glam::Quat;

    /// Camera looks down -Z, props sit on the z = 0 plane
    const FORWARD: Vec3 = Vec3::NEG_Z;

    fn ray_at(x: f32, y: f32) -> Option<Ray> {
        Ray::new(Vec3::new(x, y, 10.0), FORWARD)
    }

    fn displaced_prop() -> Vec<InteractableEntity> {
        let mut e =
            InteractableEntity::new(EntityId(7), "book", Pose::default(), 2, 0.5, 0.5).unwrap();
        e.apply_displacement(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);
        vec![e]
    }

    fn controller() -> InteractionController {
        InteractionController::new(&InteractionConfig::default())
    }

    fn press(ray: Option<Ray>) -> PointerInput {
        PointerInput {
            ray,
            pressed: true,
            just_pressed: true,
            just_released: false,
        }
    }

    fn hold(ray: Option<Ray>) -> PointerInput {
        PointerInput {
            ray,
            pressed: true,
            ..Default::default()
        }
    }

    fn hover(ray: Option<Ray>) -> PointerInput {
        PointerInput {
            ray,
            ..Default::default()
        }
    }

    fn release(ray: Option<Ray>) -> PointerInput {
        PointerInput {
            ray,
            just_released: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_hover_enter_exit() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&hover(ray_at(2.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.hovered(), Some(0));
        assert_eq!(entities[0].styling(), Styling::Highlight);

        c.tick(&hover(ray_at(9.0, 9.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.hovered(), None);
        assert_eq!(entities[0].styling(), Styling::Wrong);
    }

    #[test]
    fn test_drag_and_fix() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&press(ray_at(2.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.dragging(), Some(0));
        assert_eq!(out, vec![InteractionEvent::DragStarted(EntityId(7))]);

        c.tick(&hold(ray_at(0.2, 0.1)), true, Some(FORWARD), &mut entities, &mut out);
        assert!(entities[0].current_pose().position.abs_diff_eq(Vec3::new(0.2, 0.1, 0.0), 1e-4));

        c.tick(&release(ray_at(0.2, 0.1)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.dragging(), None);
        assert_eq!(entities[0].state(), EntityState::Correct);
        assert_eq!(
            out.last(),
            Some(&InteractionEvent::Fixed {
                id: EntityId(7),
                points: 2
            })
        );
    }

    #[test]
    fn test_press_on_empty_space_does_nothing() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();
        c.tick(&press(ray_at(-5.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.dragging(), None);
        assert!(out.is_empty());
    }

    #[test]
    fn test_ray_loss_suspends_drag() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&press(ray_at(2.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&hold(ray_at(1.5, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&hold(None), true, Some(FORWARD), &mut entities, &mut out);

        assert_eq!(c.hovered(), None);
        assert_eq!(c.dragging(), Some(0));
        assert_eq!(entities[0].state(), EntityState::Dragging);
        assert!(entities[0].current_pose().position.abs_diff_eq(Vec3::new(1.5, 0.0, 0.0), 1e-4));

        // Ray comes back and the drag carries on
        c.tick(&hold(ray_at(0.1, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&release(None), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(entities[0].state(), EntityState::Correct);
    }

    #[test]
    fn test_pause_freezes_drag() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&press(ray_at(2.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&hold(ray_at(1.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&hold(ray_at(-3.0, 0.0)), false, Some(FORWARD), &mut entities, &mut out);
        c.tick(&release(ray_at(0.0, 0.0)), false, Some(FORWARD), &mut entities, &mut out);

        assert_eq!(entities[0].state(), EntityState::Dragging);
        assert!(entities[0].current_pose().position.abs_diff_eq(Vec3::X, 1e-4));

        // Resumed with the button up: the drag carries on until a release
        c.tick(&hover(ray_at(1.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.dragging(), Some(0));
        assert_eq!(entities[0].state(), EntityState::Dragging);
        assert_eq!(out, vec![InteractionEvent::DragStarted(EntityId(7))]);

        c.tick(&hold(ray_at(0.1, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&release(ray_at(0.1, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.dragging(), None);
        assert_eq!(entities[0].state(), EntityState::Correct);
    }

    #[test]
    fn test_focus_loss_keeps_drag() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&press(ray_at(2.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        c.tick(&hold(ray_at(1.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        // No ray and no button state for a few ticks
        for _ in 0..5 {
            c.tick(&PointerInput::default(), true, Some(FORWARD), &mut entities, &mut out);
        }

        assert_eq!(c.dragging(), Some(0));
        assert_eq!(entities[0].state(), EntityState::Dragging);
        assert!(entities[0].current_pose().position.abs_diff_eq(Vec3::X, 1e-4));
        assert_eq!(out, vec![InteractionEvent::DragStarted(EntityId(7))]);

        c.tick(&release(None), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(entities[0].state(), EntityState::Displaced);
        assert_eq!(out.last(), Some(&InteractionEvent::DropMissed(EntityId(7))));
    }

    #[test]
    fn test_haunted_under_pointer_highlights() {
        let mut entities = vec![
            InteractableEntity::new(EntityId(3), "lamp", Pose::default(), 1, 0.1, 0.5).unwrap(),
        ];
        let mut c = controller();
        let mut out = Vec::new();

        c.tick(&hover(ray_at(0.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.hovered(), Some(0));
        assert_eq!(entities[0].styling(), Styling::Default);

        // Moved a little, still under the resting pointer
        entities[0].apply_displacement(Vec3::new(0.2, 0.0, 0.0), Quat::IDENTITY);
        c.tick(&hover(ray_at(0.0, 0.0)), true, Some(FORWARD), &mut entities, &mut out);
        assert_eq!(c.hovered(), Some(0));
        assert_eq!(entities[0].styling(), Styling::Highlight);
    }

    #[test]
    fn test_missing_camera_keeps_pose() {
        let mut entities = displaced_prop();
        let mut c = controller();
        let mut out = Vec::new();
        c.tick(&press(ray_at(2.0, 0.0)), true, None, &mut entities, &mut out);
        c.tick(&hold(ray_at(0.0, 0.0)), true, None, &mut entities, &mut out);
        assert_eq!(entities[0].current_pose().position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let mut near =
            InteractableEntity::new(EntityId(1), "near", Pose::default(), 1, 0.1, 0.5).unwrap();
        let far = InteractableEntity::new(
            EntityId(2),
            "far",
            Pose::from_position(Vec3::new(0.0, 0.0, -5.0)),
            1,
            0.1,
            0.5,
        )
        .unwrap();
        near.apply_displacement(Vec3::new(0.0, 0.0, 2.0), Quat::IDENTITY);
        let entities = vec![far, near];
        assert_eq!(controller().pick(&ray_at(0.0, 0.0).unwrap(), &entities), Some(1));
    }

    #[test]
    fn test_pick_distance_limit() {
        let entities = displaced_prop();
        let c = InteractionController::new(&InteractionConfig { pick_distance: 5.0 });
        assert_eq!(c.pick(&ray_at(2.0, 0.0).unwrap(), &entities), None);
    }
}
