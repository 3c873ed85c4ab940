//! ECS resources made available to systems.
//!
//! Overview
//! - `animationstore` – animation sets shared by every actor of a kind
//! - `gameconfig` – gameplay tuning loaded from INI
//! - `input` – per-frame button state with press/release edges
//! - `quadtree` – spatial index of the active room's actors
//! - `room` – room files, the room library and the active room
//! - `tilegrid` – static collision grid of the active room
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod gameconfig;
pub mod input;
pub mod quadtree;
pub mod room;
pub mod tilegrid;
pub mod worldtime;
