//! Shared fixtures for the integration tests: in-memory animation catalogues,
//! room builders and small accessors over a running [`Simulation`].
#![allow(dead_code)]

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashMap;

use platcore::components::animation::Animator;
use platcore::components::boxcollider::BoxCollider;
use platcore::components::goblin::{GOBLIN_ANIMATIONS, Goblin, GoblinState};
use platcore::components::player::PLAYER_ANIMATIONS;
use platcore::game::{FIRE_ANIMATIONS, Simulation, build_world};
use platcore::geometry::Rect;
use platcore::resources::animationstore::{AnimationDef, AnimationFrame, AnimationSet, AnimationStore};
use platcore::resources::gameconfig::GameConfig;
use platcore::resources::input::InputSnapshot;
use platcore::resources::quadtree::SpatialIndex;
use platcore::resources::room::{ActorSpawn, RoomData, RoomLibrary};
use platcore::resources::tilegrid::{DoorData, DoorDirection};

pub const DT: f32 = 16.0;
pub const EPSILON: f32 = 1e-4;

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn frames(count: usize, duration: f32) -> Vec<AnimationFrame> {
    (0..count)
        .map(|i| AnimationFrame {
            region: Rect::new(i as f32 * 32.0, 0.0, 32.0, 32.0),
            duration,
        })
        .collect()
}

fn set_of(kind: &str, names: &[&str], one_shot: Option<(&str, usize)>) -> AnimationSet {
    let mut animations = FxHashMap::default();
    for name in names {
        let def = match one_shot {
            Some((shot, count)) if shot == *name => AnimationDef {
                looping: false,
                next: None,
                frames: frames(count, 100.0),
            },
            _ => AnimationDef {
                looping: true,
                next: None,
                frames: frames(1, 100.0),
            },
        };
        animations.insert(name.to_string(), def);
    }
    AnimationSet::new(kind, animations).unwrap()
}

/// Player and fire loop forever; the goblin attack is four 100ms frames.
pub fn animations() -> AnimationStore {
    let mut store = AnimationStore::new();
    store.insert(set_of("player", &PLAYER_ANIMATIONS, None));
    store.insert(set_of("goblin", &GOBLIN_ANIMATIONS, Some(("attack", 4))));
    store.insert(set_of("fire", &FIRE_ANIMATIONS, None));
    store
}

pub fn door(x_tu: usize, y_tu: usize, direction: DoorDirection, target: &str) -> DoorData {
    DoorData {
        x_tu,
        y_tu,
        direction,
        target_room: target.to_string(),
    }
}

pub fn room(
    name: &str,
    origin_tu: [i32; 2],
    rows: &[&str],
    doors: Vec<DoorData>,
    actors: &[(&str, f32, f32)],
    spawn: [f32; 2],
) -> RoomData {
    RoomData {
        name: name.to_string(),
        stage: String::new(),
        origin_tu,
        rows: rows.iter().map(|r| r.to_string()).collect(),
        doors,
        actors: actors
            .iter()
            .map(|(kind, x, y)| ActorSpawn {
                kind: kind.to_string(),
                x: *x,
                y: *y,
            })
            .collect(),
        spawn,
    }
}

pub fn simulation(rooms: Vec<RoomData>, start: &str) -> Simulation {
    let mut library = RoomLibrary::new();
    for data in rooms {
        library.insert(data).unwrap();
    }
    let world = build_world(GameConfig::new(), library, animations(), start).unwrap();
    Simulation::new(world)
}

pub fn run(sim: &mut Simulation, input: InputSnapshot, frames: usize) {
    for _ in 0..frames {
        sim.step(input, DT);
    }
}

pub fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

pub fn holding_right() -> InputSnapshot {
    InputSnapshot {
        right: true,
        ..InputSnapshot::default()
    }
}

pub fn goblin_state(sim: &mut Simulation) -> GoblinState {
    let world = sim.world_mut();
    let mut goblins = world.query::<&Goblin>();
    goblins.iter(world).next().unwrap().state
}

pub fn goblin_frame(sim: &mut Simulation) -> usize {
    let world = sim.world_mut();
    let mut goblins = world.query_filtered::<&Animator, With<Goblin>>();
    goblins.iter(world).next().unwrap().frame_index()
}

/// Move the player's mid-bottom to `point`, keeping the index in sync.
pub fn teleport_player(sim: &mut Simulation, point: Vec2) {
    let world = sim.world_mut();
    let (entity, bounds) = {
        let mut players = world.query_filtered::<(Entity, &mut BoxCollider), With<platcore::components::player::Player>>();
        let (entity, mut collider) = players.iter_mut(world).next().unwrap();
        collider.set_mid_bottom(point);
        (entity, collider.bounds)
    };
    assert!(world.resource_mut::<SpatialIndex>().relocate(entity, bounds));
}
