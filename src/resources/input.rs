//! Per-frame input resource.
//!
//! The simulation never polls devices. Each frame a plain [`InputSnapshot`]
//! of held buttons is fed in, and [`InputState`] derives the press/release
//! edges the state machines react to.
use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean button state with edge flags.
pub struct BoolState {
    /// Whether the button is held this frame.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Advance one frame with the new held level.
    pub fn update(&mut self, held: bool) {
        self.just_pressed = held && !self.active;
        self.just_released = !held && self.active;
        self.active = held;
    }
}

/// Held buttons for one frame, as produced by whatever reads the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub jump: bool,
}

/// Resource capturing the per-frame button state relevant to gameplay.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: BoolState,
    pub right: BoolState,
    pub down: BoolState,
    pub jump: BoolState,
}

impl InputState {
    pub fn apply(&mut self, snapshot: InputSnapshot) {
        self.left.update(snapshot.left);
        self.right.update(snapshot.right);
        self.down.update(snapshot.down);
        self.jump.update(snapshot.jump);
    }

    /// Horizontal intent: -1, 0 or 1. Both held cancel out.
    pub fn direction(&self) -> i32 {
        self.right.active as i32 - self.left.active as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
    }

    #[test]
    fn test_press_hold_release_edges() {
        let mut bs = BoolState::default();
        bs.update(true);
        assert!(bs.active && bs.just_pressed && !bs.just_released);
        bs.update(true);
        assert!(bs.active && !bs.just_pressed);
        bs.update(false);
        assert!(!bs.active && bs.just_released);
        bs.update(false);
        assert!(!bs.just_released);
    }

    #[test]
    fn test_direction() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), 0);
        input.apply(InputSnapshot {
            left: true,
            ..Default::default()
        });
        assert_eq!(input.direction(), -1);
        input.apply(InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        });
        assert_eq!(input.direction(), 0);
    }
}
