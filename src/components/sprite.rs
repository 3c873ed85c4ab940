use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;

/// Render sink output. The simulation writes which sheet region to show and
/// where; drawing it is left to whoever consumes the world.
///
/// `origin` is the offset from the sheet frame's top-left to the collider's
/// top-left, so `position = collider position - origin`.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Sprite sheet key, by convention the actor kind name.
    pub sheet: String,
    pub region: Rect,
    pub origin: Vec2,
    pub position: Vec2,
    pub flip_h: bool,
    pub visible: bool,
}

impl Sprite {
    pub fn new(sheet: impl Into<String>, region: Rect, origin: Vec2) -> Self {
        Self {
            sheet: sheet.into(),
            region,
            origin,
            position: Vec2::ZERO,
            flip_h: false,
            visible: true,
        }
    }
}
