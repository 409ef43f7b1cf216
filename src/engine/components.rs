//! Component definitions for aquarium entities
//!
//! Simulation state lives in typed components attached to scene entities,
//! keeping it separate from the rendering data Bevy manages.

use bevy::prelude::*;

/// Swimming fish root entity
///
/// The visual parts (body, tail) are child meshes; this component carries
/// the behavioral state the update systems mutate every frame.
#[derive(Component)]
pub struct Fish {
    /// Current travel direction and magnitude, scaled by the global
    /// speed multiplier during integration
    pub velocity: Vec3,
    /// Nominal speed shown in the info panel
    pub speed: f32,
    /// Smoothed heading around Y, blended toward the travel direction
    pub yaw: f32,
    /// Per-fish offset into the tail flutter cycle
    pub phase: f32,
    /// Base color, reported on selection
    pub base_color: Color,
}

/// Tail cone child of a fish, animated with a flutter that is a pure
/// function of time and the owning fish's phase
#[derive(Component)]
pub struct FishTail {
    pub rest_rotation: Quat,
}

/// Local-space half extents of a pickable sub-mesh
///
/// The picking system expands these through the global transform into a
/// world AABB for ray tests. Only fish parts carry this component.
#[derive(Component)]
pub struct PickBounds {
    pub half_extents: Vec3,
}

/// Rising bubble
#[derive(Component)]
pub struct Bubble {
    /// Vertical rise speed (units per second)
    pub rise_speed: f32,
    /// Gentle horizontal wobble (x, z units per second)
    pub drift: Vec2,
}

/// Swaying seaweed blade
#[derive(Component)]
pub struct Seaweed {
    pub phase: f32,
    pub sway_speed: f32,
}

/// Static decor the fish steer around (rocks, coral)
#[derive(Component)]
pub struct Obstacle {
    /// World-space half extents of the obstacle's bounding box
    pub half_extents: Vec3,
}

/// Marker for the translucent tank walls and floor
#[derive(Component)]
pub struct TankWall;

/// Directional light whose intensity breathes slowly over time
#[derive(Component)]
pub struct PulsingLight {
    pub base_illuminance: f32,
}

/// Marker component for the offscreen rendering camera
///
/// Entities with this component are cameras that render to an offscreen
/// texture instead of a window.
#[derive(Component)]
pub struct OffscreenCamera;

/// Marker component for cameras that can be controlled by user input
///
/// Entities with this component will respond to pointer input for
/// orbit camera control (rotation, zoom).
#[derive(Component)]
pub struct CameraController;

/// Marker for the currently selected fish; at most one exists at a time
#[derive(Component)]
pub struct Selected;
