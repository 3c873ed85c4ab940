//! Input update.
//!
//! The simulation never reads devices. The runner hands a held-button
//! [`InputSnapshot`] to [`update_input_state`] before each frame; edges are
//! derived against the previous frame.
use bevy_ecs::prelude::*;

use crate::resources::input::{InputSnapshot, InputState};

pub fn update_input_state(world: &mut World, snapshot: InputSnapshot) {
    world.resource_mut::<InputState>().apply(snapshot);
}
