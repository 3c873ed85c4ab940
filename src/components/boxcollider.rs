use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::{Rect, TILE_SIZE};

/// Physical box of an actor in world pixels. The size is fixed after
/// construction; only the position changes, and only through the mover or a
/// room transition.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub bounds: Rect,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
        }
    }

    /// Stand the box on the tile whose top-left pixel is `(tile_x, tile_y)`:
    /// horizontally centred on the tile, bottom flush with the tile's bottom.
    pub fn standing_on_tile(mut self, tile_x: f32, tile_y: f32) -> Self {
        self.set_mid_bottom(Vec2::new(tile_x + TILE_SIZE / 2.0, tile_y + TILE_SIZE));
        self
    }

    pub fn mid_bottom(&self) -> Vec2 {
        Vec2::new(self.bounds.center_x(), self.bounds.bottom())
    }

    pub fn set_mid_bottom(&mut self, point: Vec2) {
        self.bounds.x = point.x - self.bounds.w / 2.0;
        self.bounds.y = point.y - self.bounds.h;
    }

    /// Box of `size` sharing this box's centre.
    pub fn centered_box(&self, width: f32, height: f32) -> Rect {
        Rect::new(0.0, 0.0, width, height).centered_on(self.bounds.center())
    }
}
