//! Event types and observers used by the simulation.
//!
//! Events decouple the system that notices something from the code that
//! reacts to it. Every observer here is registered once when the world is
//! built (see [`crate::game::build_world`]) and marked persistent so room
//! changes keep it alive.
//!
//! Submodules:
//! - [`animation`] – end of a non-looping animation; goblin attack replay
//! - [`damage`] – hits dealt to the player
//! - [`door`] – door contact turning into a pending room change
pub mod animation;
pub mod damage;
pub mod door;
