//! Animation playback.
//!
//! [`animation_system`] ticks every [`Animator`] by the frame delta, copies
//! the frame on screen into the entity's [`Sprite`] and triggers an
//! [`AnimationEndEvent`] for each animation that finished this frame.
//!
//! It runs first in the frame so state logic sees this frame's animation
//! cursor (the goblin's hit frames depend on it).

use bevy_ecs::prelude::*;

use crate::components::animation::Animator;
use crate::components::sprite::Sprite;
use crate::events::animation::AnimationEndEvent;
use crate::resources::worldtime::WorldTime;

pub fn animation_system(
    mut query: Query<(Entity, &mut Animator, Option<&mut Sprite>)>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut animator, sprite) in query.iter_mut() {
        let ended = animator.tick(time.delta);
        if let Some(mut sprite) = sprite {
            sprite.region = animator.region();
        }
        if let Some(animation) = ended {
            commands.trigger(AnimationEndEvent { entity, animation });
        }
    }
}
