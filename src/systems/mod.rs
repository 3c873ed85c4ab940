//! Simulation systems.
//!
//! Submodules overview
//! - [`animation`] – tick animators, feed sprite regions, report ended animations
//! - [`goblin`] – goblin motion and state logic
//! - [`goddess`] – save-point statue logic
//! - [`input`] – feed a held-button snapshot into [`crate::resources::input::InputState`]
//! - [`kinematic`] – stepped tile collision for every kinematic actor
//! - [`motion`] – gravity for plain falling bodies
//! - [`player`] – player motion and state logic
//! - [`render`] – render sink output on sprites
//! - [`room`] – apply pending room changes
//! - [`time`] – update simulation time and delta
//!
//! The per-frame order is fixed in [`crate::game::build_schedule`].

pub mod animation;
pub mod goblin;
pub mod goddess;
pub mod input;
pub mod kinematic;
pub mod motion;
pub mod player;
pub mod render;
pub mod room;
pub mod time;
