//! Save-point statue. It watches its own box and shows a prompt while the
//! player stands inside it.

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::statemachine::StateLabel;
use crate::geometry::Rect;

pub const GODDESS_SIZE: (f32, f32) = (96.0, 80.0);

/// Fixed sheet region; the statue is not animated.
pub const GODDESS_REGION: Rect = Rect {
    x: 384.0,
    y: 512.0,
    w: 96.0,
    h: 80.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoddessState {
    Looking,
    Found,
}

impl StateLabel for GoddessState {
    const ALL: &'static [Self] = &[GoddessState::Looking, GoddessState::Found];

    fn label(self) -> &'static str {
        match self {
            GoddessState::Looking => "looking",
            GoddessState::Found => "found",
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwinGoddess {
    pub state: GoddessState,
    pub prompt_visible: bool,
}

impl Default for TwinGoddess {
    fn default() -> Self {
        Self {
            state: GoddessState::Looking,
            prompt_visible: false,
        }
    }
}

impl TwinGoddess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, next: GoddessState) {
        if next != self.state {
            debug!("twin_goddess: {} -> {}", self.state.label(), next.label());
        }
        self.state = next;
        self.prompt_visible = next == GoddessState::Found;
    }

    pub fn update_logic(&mut self, player_present: bool) {
        if player_present {
            self.set_state(GoddessState::Found);
        } else {
            self.set_state(GoddessState::Looking);
        }
    }
}
