use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::goddess::TwinGoddess;
use crate::components::player::Player;
use crate::resources::quadtree::SpatialIndex;

/// The statue looks for the player inside its own box.
pub fn goddess_logic(
    mut goddesses: Query<(&mut TwinGoddess, &BoxCollider)>,
    players: Query<Entity, With<Player>>,
    index: Res<SpatialIndex>,
) {
    let player = players.single().ok();
    for (mut goddess, collider) in goddesses.iter_mut() {
        let present = player.is_some_and(|p| index.search(&collider.bounds).contains(&p));
        goddess.update_logic(present);
    }
}
