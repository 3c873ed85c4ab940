//! Room transitions, the save statue and whole-run determinism.
#![allow(dead_code, unused_imports)]

mod common;

use bevy_ecs::prelude::*;
use glam::Vec2;

use common::*;
use platcore::components::actor::{Actor, ActorKind};
use platcore::components::boxcollider::BoxCollider;
use platcore::components::goddess::TwinGoddess;
use platcore::error::LoadError;
use platcore::game::{Simulation, build_world};
use platcore::resources::gameconfig::GameConfig;
use platcore::resources::input::InputSnapshot;
use platcore::resources::quadtree::SpatialIndex;
use platcore::resources::room::{PendingRoomChange, RoomLibrary};
use platcore::resources::tilegrid::DoorDirection;

/// Two rooms side by side, joined by a two-tile door.
fn corridor() -> Simulation {
    let entrance = room(
        "entrance",
        [0, 0],
        &[
            "##########",
            "#........#",
            "#........#",
            "#........#",
            "#........#",
            "#........D",
            "#........D",
            "##########",
        ],
        vec![
            door(9, 5, DoorDirection::Right, "hall"),
            door(9, 6, DoorDirection::Right, "hall"),
        ],
        &[("crate", 32.0, 80.0), ("fire", 48.0, 96.0)],
        [112.0, 96.0],
    );
    let hall = room(
        "hall",
        [10, 0],
        &[
            "##########",
            "#........#",
            "#........#",
            "#........#",
            "#........#",
            "D........#",
            "D........#",
            "##########",
        ],
        vec![
            door(0, 5, DoorDirection::Left, "entrance"),
            door(0, 6, DoorDirection::Left, "entrance"),
        ],
        &[("goblin", 272.0, 96.0)],
        [200.0, 96.0],
    );
    simulation(vec![entrance, hall], "entrance")
}

fn kinds(sim: &mut Simulation) -> Vec<ActorKind> {
    let world = sim.world_mut();
    let mut actors = world.query::<&Actor>();
    let mut kinds: Vec<ActorKind> = actors.iter(world).map(|a| a.kind).collect();
    kinds.sort();
    kinds
}

fn run_until_room(sim: &mut Simulation, input: InputSnapshot, name: &str, limit: usize) -> usize {
    for frame in 1..=limit {
        sim.step(input, DT);
        if sim.room_name() == name {
            return frame;
        }
    }
    panic!("never reached room '{name}'");
}

#[test]
fn start_room_spawns_its_actors() {
    let mut sim = corridor();
    assert_eq!(sim.room_name(), "entrance");
    assert_eq!(
        kinds(&mut sim),
        vec![ActorKind::Player, ActorKind::Fire, ActorKind::Crate]
    );
    // Fire is drawn but never collides, so it stays out of the index.
    let index = sim.world().resource::<SpatialIndex>();
    assert_eq!(index.len(), 2);
    assert!(index.is_consistent());
}

#[test]
fn crate_falls_and_rests_on_the_floor() {
    let mut sim = corridor();
    let crate_box = |sim: &mut Simulation| {
        let world = sim.world_mut();
        let mut crates = world.query::<(&Actor, &BoxCollider)>();
        crates
            .iter(world)
            .find(|(actor, _)| actor.kind == ActorKind::Crate)
            .map(|(_, collider)| collider.bounds)
            .unwrap()
    };
    assert_eq!(crate_box(&mut sim).bottom(), 96.0);

    run(&mut sim, idle(), 60);
    let bounds = crate_box(&mut sim);
    assert_eq!(bounds.bottom(), 112.0);
    assert_eq!(bounds.x, 32.0);
    let index = sim.world().resource::<SpatialIndex>();
    assert!(index.is_consistent());
}

#[test]
fn door_leads_to_linked_room() {
    let mut sim = corridor();
    run(&mut sim, idle(), 10);
    run_until_room(&mut sim, holding_right(), "hall", 90);

    // One tile inside the lower back door at (160, 96).
    let player = sim.player().unwrap();
    assert_eq!(player.position, Vec2::new(184.0 - 3.0, 112.0 - 31.0));

    assert_eq!(kinds(&mut sim), vec![ActorKind::Player, ActorKind::Goblin]);
    let world = sim.world();
    let index = world.resource::<SpatialIndex>();
    assert_eq!(index.len(), 2);
    assert!(index.is_consistent());
    assert!(!world.resource::<PendingRoomChange>().is_pending());
}

#[test]
fn walking_back_restores_the_first_room() {
    let mut sim = corridor();
    run(&mut sim, idle(), 10);
    run_until_room(&mut sim, holding_right(), "hall", 90);

    let left = InputSnapshot {
        left: true,
        ..InputSnapshot::default()
    };
    run_until_room(&mut sim, left, "entrance", 120);

    let player = sim.player().unwrap();
    assert_eq!(player.position, Vec2::new(136.0 - 3.0, 112.0 - 31.0));
    assert_eq!(
        kinds(&mut sim),
        vec![ActorKind::Player, ActorKind::Fire, ActorKind::Crate]
    );
}

#[test]
fn goddess_prompt_follows_the_player() {
    let shrine = room(
        "shrine",
        [0, 0],
        &[
            "############",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "############",
        ],
        vec![],
        &[("twin_goddess", 112.0, 96.0)],
        [16.0, 96.0],
    );
    let mut sim = simulation(vec![shrine], "shrine");

    let prompt = |sim: &mut Simulation| {
        let world = sim.world_mut();
        let mut goddesses = world.query::<&TwinGoddess>();
        goddesses.iter(world).next().unwrap().prompt_visible
    };

    run(&mut sim, idle(), 10);
    assert!(!prompt(&mut sim));

    run(&mut sim, holding_right(), 60);
    assert!(prompt(&mut sim));
}

#[test]
fn unknown_start_room_is_rejected() {
    let mut library = RoomLibrary::new();
    library
        .insert(room("only", [0, 0], &["###", "#.#", "###"], vec![], &[], [16.0, 0.0]))
        .unwrap();
    let result = build_world(GameConfig::new(), library, animations(), "elsewhere");
    assert!(matches!(result, Err(LoadError::UnknownRoom(name)) if name == "elsewhere"));
}

#[test]
fn shipped_assets_run_deterministically() {
    let assets = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
    let mut a = Simulation::from_assets(assets, GameConfig::new(), None).unwrap();
    let mut b = Simulation::from_assets(assets, GameConfig::new(), None).unwrap();
    assert_eq!(a.room_name(), "entrance");

    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..400 {
        let input = InputSnapshot {
            left: rng.u8(0..4) == 0,
            right: rng.bool(),
            down: rng.u8(0..8) == 0,
            jump: rng.u8(0..5) == 0,
        };
        a.step(input, DT);
        b.step(input, DT);
        assert_eq!(a.checksum(), b.checksum());
        assert_eq!(a.room_name(), b.room_name());
    }
    assert_eq!(a.frame_count(), 400);
}
