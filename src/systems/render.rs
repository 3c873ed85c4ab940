//! Render sink.
//!
//! The simulation does not draw. [`render_sink`] runs last each frame and
//! leaves in every [`Sprite`] the world position and visibility a renderer
//! needs; the source region is kept current by the animation system.
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::player::Player;
use crate::components::sprite::Sprite;

pub fn render_sink(mut query: Query<(&BoxCollider, &mut Sprite, Option<&Player>)>) {
    for (collider, mut sprite, player) in query.iter_mut() {
        sprite.position = collider.bounds.position() - sprite.origin;
        sprite.visible = !player.is_some_and(|p| p.hidden);
    }
}
