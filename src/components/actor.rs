//! Actor identity component.
//!
//! Every gameplay entity spawned from a room carries an [`Actor`]: its kind
//! and the integer id it was given when the room was instantiated. The ECS
//! [`Entity`](bevy_ecs::entity::Entity) is the key used by the spatial
//! index; the id is kept for logs and stable ordering.

use std::fmt;

use bevy_ecs::prelude::Component;

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorKind {
    Player,
    Goblin,
    TwinGoddess,
    Fire,
    Crate,
}

impl ActorKind {
    pub const ALL: [ActorKind; 5] = [
        ActorKind::Player,
        ActorKind::Goblin,
        ActorKind::TwinGoddess,
        ActorKind::Fire,
        ActorKind::Crate,
    ];

    /// Name used in room files and animation catalogue file names.
    pub fn name(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Goblin => "goblin",
            ActorKind::TwinGoddess => "twin_goddess",
            ActorKind::Fire => "fire",
            ActorKind::Crate => "crate",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| LoadError::UnknownActorKind(name.to_string()))
    }

    /// Kinds that may appear in a room's actor list. The player is spawned
    /// once by the game and carried between rooms.
    pub fn room_kinds() -> [&'static str; 4] {
        [
            ActorKind::Goblin.name(),
            ActorKind::TwinGoddess.name(),
            ActorKind::Fire.name(),
            ActorKind::Crate.name(),
        ]
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub kind: ActorKind,
    pub id: u32,
}

impl Actor {
    pub fn new(kind: ActorKind, id: u32) -> Self {
        Self { kind, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ActorKind::ALL {
            assert_eq!(ActorKind::from_name(kind.name()).unwrap(), kind);
        }
        assert!(matches!(
            ActorKind::from_name("dragon"),
            Err(LoadError::UnknownActorKind(_))
        ));
    }

    #[test]
    fn test_player_is_not_a_room_kind() {
        assert!(!ActorKind::room_kinds().contains(&"player"));
    }
}
