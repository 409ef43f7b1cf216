//! Camera control system
//!
//! Orbit camera controls driven by pointer input forwarded from the
//! frontend: left-drag rotates, scroll zooms.

use bevy::{math::Vec3, prelude::*};

use crate::config::camera::*;
use crate::engine::components::CameraController;
use crate::engine::resources::{OrbitCameraState, PointerInputRes};

/// Update camera transform based on pointer input
/// Implements orbit camera control:
/// - Left button drag: rotate camera (yaw/pitch)
/// - Scroll wheel: zoom (adjust distance)
pub fn update_camera_from_input(
    pointer_input_res: Option<Res<PointerInputRes>>,
    mut orbit_state: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<CameraController>>,
) {
    let Some(pointer_res) = pointer_input_res else {
        return;
    };

    // Read and clear accumulated input; clicks stay queued for picking
    let input = {
        let mut guard = match pointer_res.0 .0.lock() {
            Ok(g) => g,
            Err(_) => return,
        };
        let input = (guard.delta_x, guard.delta_y, guard.scroll_delta, guard.left_button);
        guard.delta_x = 0.0;
        guard.delta_y = 0.0;
        guard.scroll_delta = 0.0;
        input
    };
    let (delta_x, delta_y, scroll_delta, left_button) = input;

    // Apply rotation when left button is held
    if left_button && (delta_x != 0.0 || delta_y != 0.0) {
        orbit_state.yaw -= delta_x * ROTATION_SPEED;
        orbit_state.pitch -= delta_y * ROTATION_SPEED;

        // Clamp pitch to prevent camera flipping
        orbit_state.pitch = orbit_state.pitch.clamp(MIN_PITCH, MAX_PITCH);
    }

    // Apply zoom from scroll wheel
    if scroll_delta != 0.0 {
        orbit_state.distance -= scroll_delta * ZOOM_SPEED;
        orbit_state.distance = orbit_state.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    // Update camera transform based on orbit state
    for mut transform in camera_query.iter_mut() {
        // Calculate camera position using spherical coordinates
        // yaw: rotation around Y axis
        // pitch: rotation around X axis (elevation)
        let x = orbit_state.distance * orbit_state.pitch.cos() * orbit_state.yaw.sin();
        let y = orbit_state.distance * orbit_state.pitch.sin();
        let z = orbit_state.distance * orbit_state.pitch.cos() * orbit_state.yaw.cos();

        let camera_position = orbit_state.center + Vec3::new(x, y, z);
        *transform =
            Transform::from_translation(camera_position).looking_at(orbit_state.center, Vec3::Y);
    }
}
