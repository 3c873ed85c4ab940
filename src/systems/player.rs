//! Player systems.
//!
//! - [`player_motion`] applies gravity and the run lerp before the mover.
//! - [`player_logic`] runs the state machine after the mover, mirrors the
//!   sprite and reports door contacts.
use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::components::kinematic::Kinematic;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::events::door::DoorEnteredEvent;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

pub fn player_motion(
    mut query: Query<(&mut Player, &mut RigidBody, &Kinematic)>,
    time: Res<WorldTime>,
) {
    for (mut player, mut body, kinematic) in query.iter_mut() {
        player.apply_motion(&mut body, kinematic.on_floor, time.delta);
    }
}

pub fn player_logic(
    mut query: Query<(
        Entity,
        &mut Player,
        &mut RigidBody,
        &Kinematic,
        &mut Animator,
        &mut Sprite,
    )>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut player, mut body, kinematic, mut animator, mut sprite) in query.iter_mut() {
        player.update_logic(&input, kinematic, &mut body, &mut animator, time.delta);
        sprite.flip_h = player.flip_h(sprite.flip_h);
        if let Some(door) = player.door_contact.take() {
            commands.trigger(DoorEnteredEvent { entity, door });
        }
    }
}
