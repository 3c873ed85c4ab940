//! Goblin systems: motion before the mover, state logic after it.
use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::components::boxcollider::BoxCollider;
use crate::components::goblin::{Goblin, Sighting};
use crate::components::kinematic::Kinematic;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::events::damage::OuchEvent;
use crate::resources::quadtree::SpatialIndex;
use crate::resources::worldtime::WorldTime;

pub fn goblin_motion(mut query: Query<(&Goblin, &mut RigidBody)>, time: Res<WorldTime>) {
    for (goblin, mut body) in query.iter_mut() {
        goblin.apply_motion(&mut body, time.delta);
    }
}

/// Aggro checks go through the spatial index; the hit test uses the
/// player's box directly.
pub fn goblin_logic(
    mut goblins: Query<
        (
            &mut Goblin,
            &BoxCollider,
            &mut RigidBody,
            &Kinematic,
            &mut Animator,
            &mut Sprite,
        ),
        Without<Player>,
    >,
    players: Query<(Entity, &BoxCollider), With<Player>>,
    index: Res<SpatialIndex>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    let player = players.single().ok();
    for (mut goblin, collider, mut body, kinematic, mut animator, mut sprite) in goblins.iter_mut() {
        let sighting = match player {
            Some((entity, player_box)) => Sighting {
                player: Some(player_box.bounds),
                in_aggro: index
                    .search(&goblin.aggro_box(&collider.bounds))
                    .contains(&entity),
            },
            None => Sighting::default(),
        };
        let hit = goblin.update_logic(
            &sighting,
            &collider.bounds,
            kinematic,
            &mut body,
            &mut animator,
            time.delta,
        );
        sprite.flip_h = goblin.flip_h();
        if let (Some(pain_direction), Some((entity, _))) = (hit, player) {
            commands.trigger(OuchEvent {
                entity,
                pain_direction,
            });
        }
    }
}
