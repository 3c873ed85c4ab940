//! Velocity component.
//!
//! Velocities are pixels per millisecond. Motion systems write them; the
//! mover reads them and may zero components on contact (doors).

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Add `gravity * dt` to the vertical velocity, capped at `max_fall`.
    pub fn fall(&mut self, gravity: f32, max_fall: f32, dt: f32) {
        self.velocity.y = (self.velocity.y + gravity * dt).min(max_fall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_is_capped() {
        let mut rb = RigidBody::new();
        rb.fall(0.001, 0.27, 100.0);
        assert!((rb.velocity.y - 0.1).abs() < 1e-6);
        rb.fall(0.001, 0.27, 1000.0);
        assert_eq!(rb.velocity.y, 0.27);
    }
}
