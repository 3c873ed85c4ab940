//! Damage dealt to the player.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animation::Animator;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;

/// A hit on the player coming from `pain_direction` (-1 or 1).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuchEvent {
    pub entity: Entity,
    pub pain_direction: i32,
}

pub fn observe_player_ouch(
    trigger: On<OuchEvent>,
    mut players: Query<(&mut Player, &mut RigidBody, &mut Animator)>,
) {
    let event = trigger.event();
    let Ok((mut player, mut body, mut animator)) = players.get_mut(event.entity) else {
        return;
    };
    debug!("ouch from {}", event.pain_direction);
    player.ouch(event.pain_direction, &mut body, &mut animator);
}
