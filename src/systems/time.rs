//! Time update.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, before the schedule runs.
use bevy_ecs::prelude::*;

use crate::resources::gameconfig::GameConfig;
use crate::resources::worldtime::WorldTime;

/// Advance `WorldTime` by one frame of `dt` milliseconds.
///
/// The delta is clamped to `[0, simulation.max_frame_ms]` from
/// [`GameConfig`] (when present) and then scaled by `time_scale`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let max_frame_ms = world
        .get_resource::<GameConfig>()
        .map(|config| config.simulation.max_frame_ms)
        .unwrap_or(f32::MAX);
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.clamp(0.0, max_frame_ms) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
