//! Mover state and the collision capability interface.
//!
//! [`Kinematic`] carries what the mover keeps between frames: the sub-pixel
//! remainders of each axis and the wall/floor contact flags. Any component
//! implementing [`CollisionResponse`] can be driven by the mover; the
//! implementation decides, per step, whether the touched cells stop motion.
//!
//! See [`crate::systems::kinematic`] for the stepping algorithm.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;
use crate::resources::tilegrid::{TileCategory, TileCell};

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
pub struct Kinematic {
    /// Fractional pixels not yet moved, per axis.
    pub remainder: Vec2,
    /// Set by horizontal stepping only.
    pub on_wall: bool,
    /// Set by downward vertical stepping only.
    pub on_floor: bool,
}

impl Kinematic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kinematic state for an actor spawned resting on the ground.
    pub fn grounded() -> Self {
        Self {
            on_floor: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One mover step about to happen.
pub struct Contact<'a> {
    pub axis: Axis,
    /// Cells the box would overlap after the 1px step. May be empty.
    pub cells: &'a [&'a TileCell],
    /// The box before the step.
    pub bounds: Rect,
    pub velocity: &'a mut Vec2,
}

impl Contact<'_> {
    /// A falling box resting exactly on top of `cell`.
    pub fn lands_flush_on(&self, cell: &TileCell) -> bool {
        self.axis == Axis::Y && self.velocity.y > 0.0 && self.bounds.bottom() - cell.y == 0.0
    }
}

/// Per-kind solidity rules. Return `true` to stop the current axis.
pub trait CollisionResponse {
    fn on_collide(&mut self, contact: &mut Contact<'_>) -> bool;
}

/// Stops on everything except non-colliding cells, with thin platforms solid
/// only from above.
pub fn default_solidity(contact: &Contact<'_>) -> bool {
    contact.cells.iter().any(|cell| match cell.category {
        TileCategory::Solid | TileCategory::Door => true,
        TileCategory::Thin => contact.lands_flush_on(cell),
        TileCategory::Other => false,
    })
}

/// Simple falling body that obeys [`default_solidity`].
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct SolidBody {
    pub gravity: f32,
    pub max_fall: f32,
}

impl CollisionResponse for SolidBody {
    fn on_collide(&mut self, contact: &mut Contact<'_>) -> bool {
        default_solidity(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(category: TileCategory, x: f32, y: f32) -> TileCell {
        TileCell {
            category,
            x,
            y,
            door: None,
        }
    }

    #[test]
    fn test_thin_stops_only_when_falling_flush() {
        let thin = cell(TileCategory::Thin, 0.0, 32.0);
        let cells = [&thin];
        let mut velocity = Vec2::new(0.0, 0.1);
        let mut contact = Contact {
            axis: Axis::Y,
            cells: &cells,
            bounds: Rect::new(0.0, 1.0, 6.0, 31.0),
            velocity: &mut velocity,
        };
        assert!(default_solidity(&contact));

        contact.bounds.y = 2.0;
        assert!(!default_solidity(&contact));

        contact.bounds.y = 1.0;
        contact.velocity.y = -0.1;
        assert!(!default_solidity(&contact));

        contact.velocity.y = 0.1;
        contact.axis = Axis::X;
        assert!(!default_solidity(&contact));
    }

    #[test]
    fn test_other_never_stops() {
        let other = cell(TileCategory::Other, 0.0, 0.0);
        let solid = cell(TileCategory::Solid, 16.0, 0.0);
        let mut velocity = Vec2::X;
        let only_other = [&other];
        let contact = Contact {
            axis: Axis::X,
            cells: &only_other,
            bounds: Rect::new(0.0, 0.0, 6.0, 6.0),
            velocity: &mut velocity,
        };
        assert!(!default_solidity(&contact));
        let both = [&other, &solid];
        let mut velocity = Vec2::X;
        let contact = Contact {
            axis: Axis::X,
            cells: &both,
            bounds: Rect::new(0.0, 0.0, 6.0, 6.0),
            velocity: &mut velocity,
        };
        assert!(default_solidity(&contact));
    }
}
