//! Door contact events.
//!
//! The player's collision response records the first door cell it touches;
//! its logic system then triggers a [`DoorEnteredEvent`]. The observer here
//! turns it into a [`PendingRoomChange`] that
//! [`crate::systems::room::apply_room_change`] applies at the end of the
//! frame. Only the first request of a frame is kept.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::room::{PendingRoomChange, Room, RoomChange};
use crate::resources::tilegrid::DoorLink;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DoorEnteredEvent {
    pub entity: Entity,
    pub door: DoorLink,
}

pub fn observe_door_entered(
    trigger: On<DoorEnteredEvent>,
    room: Res<Room>,
    mut pending: ResMut<PendingRoomChange>,
) {
    let door = &trigger.event().door;
    let accepted = pending.request(RoomChange {
        from: room.name.clone(),
        to: door.target_room.clone(),
    });
    if accepted {
        debug!(
            "door {:?} in '{}' requests '{}'",
            door.direction, room.name, door.target_room
        );
    }
}
