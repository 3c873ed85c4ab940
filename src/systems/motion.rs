use bevy_ecs::prelude::*;

use crate::components::kinematic::SolidBody;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Gravity for plain falling bodies such as crates.
pub fn solid_body_motion(mut query: Query<(&SolidBody, &mut RigidBody)>, time: Res<WorldTime>) {
    for (solid, mut body) in query.iter_mut() {
        body.fall(solid.gravity, solid.max_fall, time.delta);
    }
}
