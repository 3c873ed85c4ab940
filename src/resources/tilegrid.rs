//! Static collision grid of the active room.
//!
//! The grid is a flat row-major array (stride = width in tiles) of optional
//! [`TileCell`]s, built once per room and never mutated afterwards. The room's
//! origin is expressed in tile units so several rooms can share one world
//! coordinate space.
//!
//! All index arithmetic goes through [`TileGrid::clamped_index`]; callers
//! never compute `y * width + x` themselves.

use bevy_ecs::prelude::*;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geometry::{Rect, TILE_SIZE};

/// Collision category of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Solid,
    /// One-way platform, solid only from above.
    Thin,
    Door,
    /// Present in the grid but never blocks anything.
    Other,
}

/// Which room edge a door sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLink {
    pub direction: DoorDirection,
    pub target_room: String,
}

/// One non-empty grid entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCell {
    pub category: TileCategory,
    /// Absolute pixel position of the top-left corner.
    pub x: f32,
    pub y: f32,
    pub door: Option<DoorLink>,
}

impl TileCell {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, TILE_SIZE, TILE_SIZE)
    }

    pub fn is_door(&self) -> bool {
        self.category == TileCategory::Door
    }
}

/// Door entry as written in room files; coordinates are relative to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorData {
    pub x_tu: usize,
    pub y_tu: usize,
    pub direction: DoorDirection,
    pub target_room: String,
}

/// Immutable tile grid resource for the active room.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileGrid {
    origin_tu: IVec2,
    width: usize,
    height: usize,
    cells: Vec<Option<TileCell>>,
}

impl TileGrid {
    /// Build a grid from pre-baked cells. `cells.len()` must equal
    /// `width * height`; missing entries are padded as empty.
    pub fn new(origin_tu: IVec2, width: usize, height: usize, mut cells: Vec<Option<TileCell>>) -> Self {
        cells.resize(width * height, None);
        Self {
            origin_tu,
            width,
            height,
            cells,
        }
    }

    /// Parse glyph rows: `.` empty, `#` solid, `=` thin, `~` other, `D` door.
    ///
    /// Every `D` needs a matching entry in `doors` and every entry must sit on
    /// a `D`.
    pub fn from_rows(
        room: &str,
        origin_tu: IVec2,
        rows: &[String],
        doors: &[DoorData],
    ) -> Result<Self, LoadError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(LoadError::RaggedRows {
                room: room.to_string(),
            });
        }

        for door in doors {
            let glyph = rows
                .get(door.y_tu)
                .and_then(|row| row.chars().nth(door.x_tu));
            if glyph != Some('D') {
                return Err(LoadError::LinkWithoutDoor {
                    room: room.to_string(),
                    x: door.x_tu,
                    y: door.y_tu,
                });
            }
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let category = match glyph {
                    '.' => {
                        cells.push(None);
                        continue;
                    }
                    '#' => TileCategory::Solid,
                    '=' => TileCategory::Thin,
                    '~' => TileCategory::Other,
                    'D' => TileCategory::Door,
                    other => {
                        return Err(LoadError::UnknownGlyph {
                            room: room.to_string(),
                            glyph: other,
                            x,
                            y,
                        });
                    }
                };

                let door = if category == TileCategory::Door {
                    let link = doors
                        .iter()
                        .find(|d| d.x_tu == x && d.y_tu == y)
                        .ok_or_else(|| LoadError::DoorWithoutLink {
                            room: room.to_string(),
                            x,
                            y,
                        })?;
                    Some(DoorLink {
                        direction: link.direction,
                        target_room: link.target_room.clone(),
                    })
                } else {
                    None
                };

                cells.push(Some(TileCell {
                    category,
                    x: (origin_tu.x + x as i32) as f32 * TILE_SIZE,
                    y: (origin_tu.y + y as i32) as f32 * TILE_SIZE,
                    door,
                }));
            }
        }

        Ok(Self::new(origin_tu, width, height, cells))
    }

    pub fn origin_tu(&self) -> IVec2 {
        self.origin_tu
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Room bounds in world pixels.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin_tu.x as f32 * TILE_SIZE,
            self.origin_tu.y as f32 * TILE_SIZE,
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }

    /// Room-relative tile coordinate of a world pixel point.
    pub fn local_tile_of(&self, px: f32, py: f32) -> IVec2 {
        IVec2::new(
            (px / TILE_SIZE).floor() as i32 - self.origin_tu.x,
            (py / TILE_SIZE).floor() as i32 - self.origin_tu.y,
        )
    }

    /// Flat index of a room-relative tile coordinate, clamped into the grid.
    /// `None` only for an empty grid.
    pub fn clamped_index(&self, x_tu: i32, y_tu: i32) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = x_tu.clamp(0, self.width as i32 - 1) as usize;
        let y = y_tu.clamp(0, self.height as i32 - 1) as usize;
        Some(y * self.width + x)
    }

    /// Cell at a room-relative tile coordinate, clamped into the grid.
    pub fn cell_clamped(&self, x_tu: i32, y_tu: i32) -> Option<&TileCell> {
        self.clamped_index(x_tu, y_tu)
            .and_then(|i| self.cells[i].as_ref())
    }

    /// Cell at a flat index; out-of-range indices read as empty.
    pub fn cell_at(&self, index: usize) -> Option<&TileCell> {
        self.cells.get(index).and_then(|c| c.as_ref())
    }

    /// Non-empty cells with their room-relative tile coordinate, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &TileCell)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.as_ref().map(|c| (i % width, i / width, c)))
    }

    /// Door cells, row-major.
    pub fn doors(&self) -> impl Iterator<Item = &TileCell> {
        self.cells.iter().flatten().filter(|c| c.is_door())
    }
}
