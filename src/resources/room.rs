//! Room data and the registry of loaded rooms.
//!
//! A room file describes the static tile layer (as glyph rows), its doors, the
//! actors to spawn and a fallback spawn point for the player. Rooms are loaded
//! into a [`RoomLibrary`] and validated once at startup; the active room is
//! mirrored in the [`Room`] resource alongside its [`TileGrid`].

use std::path::Path;

use bevy_ecs::prelude::*;
use glam::{IVec2, Vec2};
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geometry::Rect;
use crate::resources::tilegrid::{DoorData, TileGrid};

/// Actor placement in a room file. `x`/`y` is the top-left pixel of the tile
/// the actor stands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

/// On-disk room description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    pub name: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub origin_tu: [i32; 2],
    pub rows: Vec<String>,
    #[serde(default)]
    pub doors: Vec<DoorData>,
    #[serde(default)]
    pub actors: Vec<ActorSpawn>,
    #[serde(default)]
    pub spawn: [f32; 2],
}

impl RoomData {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::json("room", e))
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::from_array(self.origin_tu)
    }

    pub fn spawn_point(&self) -> Vec2 {
        Vec2::from_array(self.spawn)
    }

    /// Bake the glyph rows into a collision grid.
    pub fn build_grid(&self) -> Result<TileGrid, LoadError> {
        TileGrid::from_rows(&self.name, self.origin(), &self.rows, &self.doors)
    }
}

/// All rooms known to the game, keyed by name.
#[derive(Resource, Debug, Clone, Default)]
pub struct RoomLibrary {
    rooms: FxHashMap<String, RoomData>,
}

impl RoomLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, room: RoomData) -> Result<(), LoadError> {
        if self.rooms.contains_key(&room.name) {
            return Err(LoadError::DuplicateRoom(room.name));
        }
        self.rooms.insert(room.name.clone(), room);
        Ok(())
    }

    /// Load every `*.json` file in `dir`, in file name order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| LoadError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut library = Self::new();
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
            let room = serde_json::from_str::<RoomData>(&text)
                .map_err(|e| LoadError::json(path.display().to_string(), e))?;
            library.insert(room)?;
        }
        info!("Loaded {} rooms from {:?}", library.len(), dir);
        Ok(library)
    }

    pub fn get(&self, name: &str) -> Result<&RoomData, LoadError> {
        self.rooms
            .get(name)
            .ok_or_else(|| LoadError::UnknownRoom(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rooms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check every room: grid glyphs and door metadata, door targets and
    /// actor kinds.
    pub fn validate(&self, known_kinds: &[&str]) -> Result<(), LoadError> {
        for name in self.names() {
            let room = &self.rooms[name];
            room.build_grid()?;
            for door in &room.doors {
                if !self.rooms.contains_key(&door.target_room) {
                    return Err(LoadError::UnknownDoorTarget {
                        room: room.name.clone(),
                        target: door.target_room.clone(),
                    });
                }
            }
            if let Some(actor) = room
                .actors
                .iter()
                .find(|a| !known_kinds.contains(&a.kind.as_str()))
            {
                return Err(LoadError::UnknownActorKind(actor.kind.clone()));
            }
        }
        Ok(())
    }
}

/// The active room.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct Room {
    pub name: String,
    pub stage: String,
    pub bounds: Rect,
    pub spawn: Vec2,
}

impl Room {
    pub fn new(data: &RoomData, grid: &TileGrid) -> Self {
        Self {
            name: data.name.clone(),
            stage: data.stage.clone(),
            bounds: grid.bounds(),
            spawn: data.spawn_point(),
        }
    }
}

/// Room switch requested by a door contact, applied at the end of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomChange {
    pub from: String,
    pub to: String,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PendingRoomChange(pub Option<RoomChange>);

impl PendingRoomChange {
    /// Record a change unless one is already pending this frame.
    pub fn request(&mut self, change: RoomChange) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(change);
        true
    }

    pub fn take(&mut self) -> Option<RoomChange> {
        self.0.take()
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALL: &str = r######"{
        "name": "hall",
        "stage": "castle",
        "rows": ["#####", "D...#", "#####"],
        "doors": [{"x_tu": 0, "y_tu": 1, "direction": "left", "target_room": "yard"}],
        "actors": [{"kind": "goblin", "x": 32, "y": 16}],
        "spawn": [32, 16]
    }"######;

    const YARD: &str = r######"{
        "name": "yard",
        "origin_tu": [-5, 0],
        "rows": ["#####", "#...D", "#####"],
        "doors": [{"x_tu": 4, "y_tu": 1, "direction": "right", "target_room": "hall"}]
    }"######;

    fn library() -> RoomLibrary {
        let mut lib = RoomLibrary::new();
        lib.insert(RoomData::from_json(HALL).unwrap()).unwrap();
        lib.insert(RoomData::from_json(YARD).unwrap()).unwrap();
        lib
    }

    #[test]
    fn test_parse_room_defaults() {
        let yard = RoomData::from_json(YARD).unwrap();
        assert_eq!(yard.stage, "");
        assert!(yard.actors.is_empty());
        assert_eq!(yard.origin(), IVec2::new(-5, 0));
        let grid = yard.build_grid().unwrap();
        assert_eq!(grid.bounds(), Rect::new(-80.0, 0.0, 80.0, 48.0));
    }

    #[test]
    fn test_validate_accepts_linked_rooms() {
        assert!(library().validate(&["goblin"]).is_ok());
        assert_eq!(library().names(), vec!["hall", "yard"]);
    }

    #[test]
    fn test_validate_rejects_unknown_kind() {
        let err = library().validate(&["player"]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownActorKind(kind) if kind == "goblin"));
    }

    #[test]
    fn test_validate_rejects_dangling_door() {
        let mut lib = RoomLibrary::new();
        lib.insert(RoomData::from_json(HALL).unwrap()).unwrap();
        let err = lib.validate(&["goblin"]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownDoorTarget { target, .. } if target == "yard"));
    }

    #[test]
    fn test_duplicate_room_is_rejected() {
        let mut lib = library();
        assert!(matches!(
            lib.insert(RoomData::from_json(HALL).unwrap()),
            Err(LoadError::DuplicateRoom(_))
        ));
    }

    #[test]
    fn test_first_pending_change_wins() {
        let mut pending = PendingRoomChange::default();
        assert!(pending.request(RoomChange {
            from: "a".into(),
            to: "b".into()
        }));
        assert!(!pending.request(RoomChange {
            from: "a".into(),
            to: "c".into()
        }));
        assert_eq!(pending.take().unwrap().to, "b");
        assert!(!pending.is_pending());
    }
}
