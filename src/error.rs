//! Load-time error type.
//!
//! Everything that can go wrong while reading rooms, animation catalogues or
//! the INI configuration surfaces as a [`LoadError`]. Gameplay code never
//! returns errors; it assumes data validated here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse config: {0}")]
    Ini(String),

    #[error("unknown actor kind '{0}'")]
    UnknownActorKind(String),

    #[error("animation catalogue for '{kind}' has no '{name}' animation")]
    MissingAnimation { kind: String, name: String },

    #[error("no animation catalogue loaded for '{0}'")]
    MissingCatalogue(String),

    #[error("animation '{kind}/{name}' has no frames")]
    EmptyAnimation { kind: String, name: String },

    #[error("room '{room}': unknown tile glyph '{glyph}' at ({x}, {y})")]
    UnknownGlyph {
        room: String,
        glyph: char,
        x: usize,
        y: usize,
    },

    #[error("room '{room}': rows have inconsistent width")]
    RaggedRows { room: String },

    #[error("room '{room}': door tile at ({x}, {y}) has no door entry")]
    DoorWithoutLink { room: String, x: usize, y: usize },

    #[error("room '{room}': door entry at ({x}, {y}) is not on a door tile")]
    LinkWithoutDoor { room: String, x: usize, y: usize },

    #[error("room '{room}': door leads to unknown room '{target}'")]
    UnknownDoorTarget { room: String, target: String },

    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    #[error("room '{0}' is defined twice")]
    DuplicateRoom(String),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        LoadError::Json {
            what: what.into(),
            source,
        }
    }
}
