//! Room transitions.
//!
//! Door contacts only record a [`PendingRoomChange`]; the switch itself
//! happens here, after every actor's logic ran, so no system ever sees a
//! half-loaded room.
use bevy_ecs::prelude::*;
use log::error;

use crate::game::load_room;
use crate::resources::room::PendingRoomChange;

/// Apply the pending room change, if any. A room that fails to load is
/// logged and the current one stays active.
pub fn apply_room_change(world: &mut World) {
    let Some(change) = world.resource_mut::<PendingRoomChange>().take() else {
        return;
    };
    if let Err(err) = load_room(world, &change.to, Some(&change.from)) {
        error!("Room change '{}' -> '{}' failed: {}", change.from, change.to, err);
    }
}
