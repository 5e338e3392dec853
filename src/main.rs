//! Haunted Props entry point
//!
//! Headless native run: builds a level, then drives the fixed-timestep loop
//! with a scripted player who drags displaced props back home.
//!
//! Usage: `haunted-props [config.json] [level.json]`

use std::path::Path;

use glam::{Vec2, Vec3};

use haunted_props::consts::*;
use haunted_props::level::{LevelDefinition, PropDefinition, RoomDefinition};
use haunted_props::session::MatchPhase;
use haunted_props::sim::{
    CameraState, EngineEvent, EntityId, EntityState, HauntEngine, Lens, Occluder, OcclusionScene,
    PointerInput, Ray, TickInput, tick,
};
use haunted_props::{EngineConfig, LoadError, MatchSession, RoomRegistry};

/// Seconds the scripted player spends in each room before moving on
const ROOM_DWELL_SECS: f32 = 20.0;
/// Ticks a scripted drag takes from grab to release
const DRAG_TICKS: u32 = 30;

fn demo_level() -> LevelDefinition {
    let room = |name: &str, x: f32| RoomDefinition {
        name: name.into(),
        camera_position: Vec3::new(x, 3.0, 10.0),
        camera_target: Vec3::new(x, 0.5, 0.0),
    };
    let prop = |name: &str, x: f32, y: f32, room: &str| {
        let mut p = PropDefinition::new(name, Vec3::new(x, y, 0.0)).in_room(room);
        p.snap_tolerance = 0.5;
        p
    };
    LevelDefinition {
        rooms: vec![room("parlor", 0.0), room("library", 30.0), room("kitchen", 60.0)],
        props: vec![
            prop("candelabra", -2.0, 1.0, "parlor"),
            prop("portrait", 0.0, 2.0, "parlor"),
            prop("teacup", 2.0, 0.5, "parlor"),
            prop("globe", 28.0, 0.5, "library"),
            prop("ledger", 30.0, 1.0, "library"),
            prop("quill", 32.0, 1.0, "library"),
            prop("kettle", 58.0, 0.5, "kitchen"),
            prop("ladle", 60.0, 1.5, "kitchen"),
            prop("rolling_pin", 62.0, 0.5, "kitchen"),
        ],
    }
}

fn demo_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    // Keep haunts near the drag plane so a camera-plane drag can undo them
    config.placement.offset_min = Vec3::new(-2.0, 0.0, -0.3);
    config.placement.offset_max = Vec3::new(2.0, 1.0, 0.3);
    config
}

/// Scene furniture that can hide a prop from the camera
fn demo_occluders() -> OcclusionScene {
    OcclusionScene::new(
        [0.0, 30.0, 60.0]
            .into_iter()
            .map(|x| Occluder::Aabb {
                min: Vec3::new(x - 0.75, 0.0, 1.5),
                max: Vec3::new(x + 0.75, 1.2, 2.0),
            })
            .collect(),
    )
}

/// What the scripted player is doing
#[derive(Debug, Clone, Copy)]
enum PlayerAction {
    Looking,
    Dragging { id: EntityId, ticks: u32, from: Vec3 },
}

struct Demo {
    engine: HauntEngine,
    session: MatchSession,
    rooms: RoomRegistry,
    occluders: OcclusionScene,
    lens: Lens,
    accumulator: f32,
    room_timer: f32,
    action: PlayerAction,
    haunts: u32,
    misses: u32,
}

impl Demo {
    fn new(config: EngineConfig, level: &LevelDefinition) -> Result<Self, LoadError> {
        Ok(Self {
            engine: HauntEngine::from_level(config, level)?,
            session: MatchSession::default(),
            rooms: RoomRegistry::from_level(level)?,
            occluders: demo_occluders(),
            lens: Lens::default(),
            accumulator: 0.0,
            room_timer: ROOM_DWELL_SECS,
            action: PlayerAction::Looking,
            haunts: 0,
            misses: 0,
        })
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    fn step(&mut self) {
        self.session.tick(SIM_DT);
        self.rooms.tick(SIM_DT);
        let camera = self.rooms.camera_state(self.lens);

        if self.session.is_play_active() && !self.rooms.is_transitioning() {
            self.room_timer -= SIM_DT;
            if self.room_timer <= 0.0 && matches!(self.action, PlayerAction::Looking) {
                self.rooms.next();
                self.room_timer = ROOM_DWELL_SECS;
            }
        }

        let input = TickInput {
            play_active: self.session.is_play_active(),
            camera: Some(camera),
            pointer: self.player_pointer(&camera),
        };
        tick(
            &mut self.engine,
            &input,
            Some(&self.occluders),
            &mut self.session,
            SIM_DT,
        );

        for event in self.engine.drain_events() {
            match event {
                EngineEvent::Haunted(_) => self.haunts += 1,
                EngineEvent::DropMissed(_) => self.misses += 1,
                EngineEvent::Fixed { .. } => {
                    log::info!("{} | {}", self.session.score_label(), self.session.timer_label());
                }
                EngineEvent::HauntSkipped(_) | EngineEvent::DragStarted(_) => {}
            }
        }
    }

    /// Scripted pointer: grab the first visible displaced prop and sweep it home
    fn player_pointer(&mut self, camera: &CameraState) -> PointerInput {
        match self.action {
            PlayerAction::Looking => {
                let target = self.engine.entities().iter().find(|e| {
                    e.state() == EntityState::Displaced
                        && camera
                            .world_to_viewport(e.current_pose().position)
                            .is_some_and(|uv| uv.cmpge(Vec2::ZERO).all() && uv.cmple(Vec2::ONE).all())
                });
                let Some(prop) = target else {
                    return PointerInput::default();
                };
                let from = prop.current_pose().position;
                self.action = PlayerAction::Dragging {
                    id: prop.id(),
                    ticks: 0,
                    from,
                };
                PointerInput {
                    ray: camera.ray_towards(from),
                    pressed: true,
                    just_pressed: true,
                    just_released: false,
                }
            }
            PlayerAction::Dragging { id, ticks, from } => {
                let Some(prop) = self.engine.entity(id) else {
                    self.action = PlayerAction::Looking;
                    return PointerInput::default();
                };
                let home = prop.home_pose().position;
                let t = (ticks + 1) as f32 / DRAG_TICKS as f32;
                let ray: Option<Ray> = camera.ray_towards(from.lerp(home, t.min(1.0)));
                if ticks + 1 >= DRAG_TICKS || prop.state() != EntityState::Dragging {
                    self.action = PlayerAction::Looking;
                    return PointerInput {
                        ray,
                        just_released: true,
                        ..Default::default()
                    };
                }
                self.action = PlayerAction::Dragging {
                    id,
                    ticks: ticks + 1,
                    from,
                };
                PointerInput {
                    ray,
                    pressed: true,
                    ..Default::default()
                }
            }
        }
    }
}

fn load_inputs() -> Result<(EngineConfig, LevelDefinition), LoadError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => demo_config(),
    };
    let level = match args.next() {
        Some(path) => LevelDefinition::load(Path::new(&path))?,
        None => demo_level(),
    };
    Ok((config, level))
}

fn main() {
    env_logger::init();
    log::info!("Haunted Props (headless) starting...");

    let mut demo = match load_inputs().and_then(|(config, level)| Demo::new(config, &level)) {
        Ok(demo) => demo,
        Err(err) => {
            log::error!("Refusing to start: {err}");
            std::process::exit(1);
        }
    };

    // Render frames at 60 fps until the match ends
    while demo.session.phase() == MatchPhase::Active {
        demo.update(1.0 / 60.0);
    }

    let outcome = match demo.session.phase() {
        MatchPhase::Won => "won",
        _ => "lost",
    };
    log::info!(
        "Match {outcome}: {} haunts, {} missed drops, {} | {}",
        demo.haunts,
        demo.misses,
        demo.session.score_label(),
        demo.session.timer_label()
    );
    println!(
        "Match {outcome} | {} | {} | final haunt interval {:.1}s",
        demo.session.score_label(),
        demo.session.timer_label(),
        demo.engine.scheduler().interval()
    );
}
