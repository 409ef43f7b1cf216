//! Ambient animation
//!
//! Stateless decor motion: seaweed sway and the slow breathing of the top
//! light. Both are pure functions of elapsed time and per-instance phase.

use bevy::prelude::*;

use crate::config::seaweed;
use crate::engine::components::{PulsingLight, Seaweed};

/// Rock each seaweed blade around its base axis
pub fn sway_seaweed(time: Res<Time>, mut query: Query<(&mut Transform, &Seaweed)>) {
    let t = time.elapsed_secs();

    for (mut transform, blade) in query.iter_mut() {
        let angle = (t * blade.sway_speed + blade.phase).sin() * seaweed::SWAY_AMPLITUDE;
        transform.rotation = Quat::from_rotation_z(angle);
    }
}

/// Subtle intensity pulse on the top light
pub fn pulse_light(time: Res<Time>, mut query: Query<(&mut DirectionalLight, &PulsingLight)>) {
    let t = time.elapsed_secs();

    for (mut light, pulse) in query.iter_mut() {
        light.illuminance = pulse.base_illuminance * (0.9 + t.sin() * 0.1);
    }
}
