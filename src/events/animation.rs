//! Animation end notifications.
//!
//! [`crate::systems::animation::animation_system`] triggers an
//! [`AnimationEndEvent`] once when a non-looping animation without successor
//! passes its last frame. Animations that hand over to a successor never
//! notify.
//!
//! [`observe_goblin_attack_end`] is the only listener: a goblin finishing its
//! attack either swings again or returns to idle.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::components::boxcollider::BoxCollider;
use crate::components::goblin::Goblin;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::resources::quadtree::SpatialIndex;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationEndEvent {
    /// Entity whose animator finished.
    pub entity: Entity,
    /// Name of the animation that ended.
    pub animation: String,
}

/// Replay the attack while the player is still inside the aggro box,
/// otherwise go back to idle.
pub fn observe_goblin_attack_end(
    trigger: On<AnimationEndEvent>,
    mut goblins: Query<(&mut Goblin, &BoxCollider, &mut RigidBody, &mut Animator)>,
    players: Query<Entity, With<Player>>,
    index: Res<SpatialIndex>,
) {
    let event = trigger.event();
    if event.animation != "attack" {
        return;
    }
    let Ok((mut goblin, collider, mut body, mut animator)) = goblins.get_mut(event.entity) else {
        return;
    };
    let in_aggro = match players.single() {
        Ok(player) => index
            .search(&goblin.aggro_box(&collider.bounds))
            .contains(&player),
        Err(_) => false,
    };
    goblin.on_attack_end(in_aggro, &mut body, &mut animator);
}
