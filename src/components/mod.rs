//! ECS components for entities.
//!
//! Submodules overview:
//! - [`actor`] – actor kind and per-room id
//! - [`animation`] – playback cursor over a kind's animation set
//! - [`boxcollider`] – the actor's pixel box
//! - [`goblin`] – melee enemy state machine
//! - [`goddess`] – save-point statue
//! - [`kinematic`] – mover state and the collision response trait
//! - [`persistent`] – marker for entities that survive room changes
//! - [`player`] – player state machine
//! - [`rigidbody`] – velocity
//! - [`sprite`] – render sink output
//! - [`statemachine`] – transition tables shared by the state machines
//! - [`timer`] – polled countdown

pub mod actor;
pub mod animation;
pub mod boxcollider;
pub mod goblin;
pub mod goddess;
pub mod kinematic;
pub mod persistent;
pub mod player;
pub mod rigidbody;
pub mod sprite;
pub mod statemachine;
pub mod timer;
