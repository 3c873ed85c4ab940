//! Platcore library.
//!
//! Runtime core of a 2D tile platformer: the stepped kinematic mover, the
//! quadtree spatial index and the actor state machines, hosted in a
//! `bevy_ecs` world. Exposed for the headless runner and integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod systems;
