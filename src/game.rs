//! World assembly: the actor factory, room loading, the per-frame schedule
//! and the [`Simulation`] driver used by the binary and the tests.

use std::hash::{Hash, Hasher};
use std::path::Path;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use rustc_hash::FxHasher;

use crate::components::actor::{Actor, ActorKind};
use crate::components::animation::Animator;
use crate::components::boxcollider::BoxCollider;
use crate::components::goblin::{GOBLIN_ANIMATIONS, GOBLIN_SIZE, Goblin};
use crate::components::goddess::{GODDESS_REGION, GODDESS_SIZE, TwinGoddess};
use crate::components::kinematic::{Kinematic, SolidBody};
use crate::components::persistent::Persistent;
use crate::components::player::{PLAYER_ANIMATIONS, PLAYER_SIZE, Player, PlayerState};
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::error::LoadError;
use crate::events::animation::observe_goblin_attack_end;
use crate::events::damage::observe_player_ouch;
use crate::events::door::observe_door_entered;
use crate::geometry::{Rect, TILE_SIZE};
use crate::resources::animationstore::AnimationStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputSnapshot, InputState};
use crate::resources::quadtree::SpatialIndex;
use crate::resources::room::{PendingRoomChange, Room, RoomLibrary};
use crate::resources::tilegrid::{DoorDirection, TileGrid};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation_system;
use crate::systems::goblin::{goblin_logic, goblin_motion};
use crate::systems::goddess::goddess_logic;
use crate::systems::input::update_input_state;
use crate::systems::kinematic::kinematic_system;
use crate::systems::motion::solid_body_motion;
use crate::systems::player::{player_logic, player_motion};
use crate::systems::render::render_sink;
use crate::systems::room::apply_room_change;
use crate::systems::time::update_world_time;

pub const FIRE_ANIMATIONS: [&str; 1] = ["burn"];

const CRATE_SIZE: (f32, f32) = (16.0, 16.0);
const CRATE_REGION: Rect = Rect {
    x: 0.0,
    y: 0.0,
    w: 16.0,
    h: 16.0,
};

/// Offset from a sheet frame's top-left to a box standing centred on its
/// bottom edge.
fn foot_origin(region: &Rect, size: (f32, f32)) -> Vec2 {
    Vec2::new((region.w - size.0) / 2.0, region.h - size.1)
}

/// Spawn one actor of `kind` standing on the tile whose top-left pixel is
/// `tile`. Every kind except `fire` is inserted into the spatial index.
pub fn spawn_actor(
    world: &mut World,
    kind: ActorKind,
    tile: Vec2,
    id: u32,
) -> Result<Entity, LoadError> {
    let config = world.resource::<GameConfig>().clone();
    let store = world.resource::<AnimationStore>();

    let entity = match kind {
        ActorKind::Player => {
            let set = store.require(kind.name(), &PLAYER_ANIMATIONS)?;
            let animator = Animator::new(set, "idle");
            let collider =
                BoxCollider::new(PLAYER_SIZE.0, PLAYER_SIZE.1).standing_on_tile(tile.x, tile.y);
            let sprite = Sprite::new(
                kind.name(),
                animator.region(),
                foot_origin(&animator.region(), PLAYER_SIZE),
            );
            world
                .spawn((
                    Actor::new(kind, id),
                    collider,
                    RigidBody::new(),
                    Kinematic::new(),
                    animator,
                    sprite,
                    Player::new(config.player),
                    Persistent,
                ))
                .id()
        }
        ActorKind::Goblin => {
            let set = store.require(kind.name(), &GOBLIN_ANIMATIONS)?;
            let animator = Animator::new(set, "idle");
            let collider =
                BoxCollider::new(GOBLIN_SIZE.0, GOBLIN_SIZE.1).standing_on_tile(tile.x, tile.y);
            let sprite = Sprite::new(
                kind.name(),
                animator.region(),
                foot_origin(&animator.region(), GOBLIN_SIZE),
            );
            world
                .spawn((
                    Actor::new(kind, id),
                    collider,
                    RigidBody::new(),
                    Kinematic::new(),
                    animator,
                    sprite,
                    Goblin::new(config.goblin),
                ))
                .id()
        }
        ActorKind::TwinGoddess => {
            let mut collider = BoxCollider::new(GODDESS_SIZE.0, GODDESS_SIZE.1);
            collider.set_mid_bottom(Vec2::new(tile.x, tile.y + TILE_SIZE));
            world
                .spawn((
                    Actor::new(kind, id),
                    collider,
                    Sprite::new(kind.name(), GODDESS_REGION, Vec2::ZERO),
                    TwinGoddess::new(),
                ))
                .id()
        }
        ActorKind::Fire => {
            let set = store.require(kind.name(), &FIRE_ANIMATIONS)?;
            let animator = Animator::new(set, "burn");
            let region = animator.region();
            let size = (region.w, region.h);
            let collider = BoxCollider::new(size.0, size.1).standing_on_tile(tile.x, tile.y);
            let sprite = Sprite::new(kind.name(), region, Vec2::ZERO);
            let entity = world
                .spawn((Actor::new(kind, id), collider, animator, sprite))
                .id();
            return Ok(entity);
        }
        ActorKind::Crate => {
            let collider =
                BoxCollider::new(CRATE_SIZE.0, CRATE_SIZE.1).standing_on_tile(tile.x, tile.y);
            world
                .spawn((
                    Actor::new(kind, id),
                    collider,
                    RigidBody::new(),
                    Kinematic::new(),
                    Sprite::new(kind.name(), CRATE_REGION, Vec2::ZERO),
                    SolidBody {
                        gravity: config.player.normal_gravity,
                        max_fall: config.player.max_fall,
                    },
                ))
                .id()
        }
    };

    if let Some(collider) = world.get::<BoxCollider>(entity).copied() {
        world
            .resource_mut::<SpatialIndex>()
            .insert(entity, collider.bounds);
    }
    Ok(entity)
}

/// Tile the player should stand on when entering `grid`: one step inside
/// the last door cell (row-major) leading back to `from`, or the room's
/// spawn point.
pub fn arrival_tile(grid: &TileGrid, room: &Room, from: Option<&str>) -> Vec2 {
    let back_door = from.and_then(|from| {
        grid.doors()
            .filter_map(|cell| {
                cell.door
                    .as_ref()
                    .filter(|link| link.target_room == from)
                    .map(|link| (cell, link.direction))
            })
            .last()
    });
    match back_door {
        Some((cell, DoorDirection::Left)) => Vec2::new(cell.x + TILE_SIZE, cell.y),
        Some((cell, DoorDirection::Right)) => Vec2::new(cell.x - TILE_SIZE, cell.y),
        Some((cell, DoorDirection::Up)) => Vec2::new(cell.x, cell.y + 2.0 * TILE_SIZE),
        Some((cell, DoorDirection::Down)) => Vec2::new(cell.x, cell.y - 2.0 * TILE_SIZE),
        None => room.spawn,
    }
}

fn place_player(world: &mut World, tile: Vec2) {
    let mut players = world.query_filtered::<(Entity, &mut BoxCollider, &mut Kinematic), With<Player>>();
    let Some((entity, mut collider, mut kinematic)) = players.iter_mut(world).next() else {
        return;
    };
    collider.set_mid_bottom(Vec2::new(tile.x + TILE_SIZE / 2.0, tile.y + TILE_SIZE));
    kinematic.remainder = Vec2::ZERO;
    let bounds = collider.bounds;
    world.resource_mut::<SpatialIndex>().insert(entity, bounds);
}

/// Replace the active room with `name`.
///
/// Non-persistent actors are despawned, the grid, room and spatial index are
/// rebuilt, the room's actors are spawned and the player is placed at its
/// arrival tile. Nothing changes when the room fails to build.
pub fn load_room(world: &mut World, name: &str, from: Option<&str>) -> Result<(), LoadError> {
    let data = world.resource::<RoomLibrary>().get(name)?.clone();
    let grid = data.build_grid()?;
    let room = Room::new(&data, &grid);
    let spawns = data
        .actors
        .iter()
        .map(|a| ActorKind::from_name(&a.kind).map(|kind| (kind, Vec2::new(a.x, a.y))))
        .collect::<Result<Vec<_>, _>>()?;

    let mut leaving = world.query_filtered::<Entity, (With<Actor>, Without<Persistent>)>();
    let doomed: Vec<Entity> = leaving.iter(world).collect();
    for entity in &doomed {
        world.despawn(*entity);
    }

    let arrival = arrival_tile(&grid, &room, from);
    world.resource_mut::<SpatialIndex>().set_region(room.bounds);
    world.insert_resource(grid);
    world.insert_resource(room);

    for (i, (kind, tile)) in spawns.into_iter().enumerate() {
        spawn_actor(world, kind, tile, i as u32 + 1)?;
    }
    place_player(world, arrival);

    info!(
        "Entered room '{}' ({} actors, {} despawned)",
        name,
        data.actors.len(),
        doomed.len()
    );
    Ok(())
}

/// Build a ready-to-run world standing in `start_room`.
///
/// The room library and animation catalogues are validated here; after this
/// point gameplay never meets missing data.
pub fn build_world(
    config: GameConfig,
    rooms: RoomLibrary,
    animations: AnimationStore,
    start_room: &str,
) -> Result<World, LoadError> {
    rooms.validate(&ActorKind::room_kinds())?;
    rooms.get(start_room)?;
    animations.require(ActorKind::Player.name(), &PLAYER_ANIMATIONS)?;
    animations.require(ActorKind::Goblin.name(), &GOBLIN_ANIMATIONS)?;
    animations.require(ActorKind::Fire.name(), &FIRE_ANIMATIONS)?;

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(SpatialIndex::new(
        Rect::default(),
        config.simulation.quadtree_depth,
    ));
    world.insert_resource(TileGrid::default());
    world.insert_resource(Room::default());
    world.insert_resource(PendingRoomChange::default());
    world.insert_resource(config);
    world.insert_resource(rooms);
    world.insert_resource(animations);

    world.spawn((Observer::new(observe_goblin_attack_end), Persistent));
    world.spawn((Observer::new(observe_player_ouch), Persistent));
    world.spawn((Observer::new(observe_door_entered), Persistent));
    world.flush();

    spawn_actor(&mut world, ActorKind::Player, Vec2::ZERO, 0)?;
    load_room(&mut world, start_room, None)?;
    Ok(world)
}

/// The fixed per-frame order: animation, motion, mover, logic, room
/// change, render sink.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            animation_system,
            player_motion,
            goblin_motion,
            solid_body_motion,
            kinematic_system::<Player>,
            kinematic_system::<Goblin>,
            kinematic_system::<SolidBody>,
            player_logic,
            goblin_logic,
            goddess_logic,
            apply_room_change,
            render_sink,
        )
            .chain(),
    );
    schedule
}

/// What the runner reports about the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub state: PlayerState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub on_floor: bool,
    pub invincible: bool,
}

/// A world plus its schedule, stepped one frame at a time.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    pub fn new(world: World) -> Self {
        Self {
            world,
            schedule: build_schedule(),
        }
    }

    /// Load `rooms/*.json` and `animations/*.json` under `assets` and start
    /// in `start_room`, or in the first room by name.
    pub fn from_assets(
        assets: impl AsRef<Path>,
        config: GameConfig,
        start_room: Option<&str>,
    ) -> Result<Self, LoadError> {
        let assets = assets.as_ref();
        let rooms = RoomLibrary::load_dir(assets.join("rooms"))?;
        let animations = AnimationStore::load_dir(assets.join("animations"))?;
        let start = match start_room {
            Some(name) => name.to_string(),
            None => rooms
                .names()
                .first()
                .map(|name| name.to_string())
                .ok_or_else(|| LoadError::UnknownRoom(String::new()))?,
        };
        let world = build_world(config, rooms, animations, &start)?;
        Ok(Self::new(world))
    }

    /// Advance one frame of `dt` milliseconds with `input` held.
    pub fn step(&mut self, input: InputSnapshot, dt: f32) {
        update_input_state(&mut self.world, input);
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn room_name(&self) -> &str {
        &self.world.resource::<Room>().name
    }

    pub fn frame_count(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    pub fn player(&mut self) -> Option<PlayerSummary> {
        let mut players =
            self.world
                .query::<(&Player, &BoxCollider, &RigidBody, &Kinematic)>();
        players
            .iter(&self.world)
            .next()
            .map(|(player, collider, body, kinematic)| PlayerSummary {
                state: player.state,
                position: collider.bounds.position(),
                velocity: body.velocity,
                on_floor: kinematic.on_floor,
                invincible: player.invincible,
            })
    }

    /// Hash of every actor box ordered by kind and id.
    pub fn checksum(&mut self) -> u64 {
        let mut actors = self.world.query::<(&Actor, &BoxCollider)>();
        let mut boxes: Vec<(Actor, Rect)> = actors
            .iter(&self.world)
            .map(|(actor, collider)| (*actor, collider.bounds))
            .collect();
        boxes.sort_by_key(|(actor, _)| (actor.kind, actor.id));

        let mut hasher = FxHasher::default();
        for (actor, bounds) in boxes {
            actor.kind.hash(&mut hasher);
            actor.id.hash(&mut hasher);
            bounds.x.to_bits().hash(&mut hasher);
            bounds.y.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}
