//! Persistent entity marker component.
//!
//! Entities with the [`Persistent`] component survive room transitions: the
//! player and the observers registered at world construction.

use bevy_ecs::prelude::Component;

/// Tag component used to mark entities that should persist across room changes.
#[derive(Component, Clone, Debug)]
pub struct Persistent;
