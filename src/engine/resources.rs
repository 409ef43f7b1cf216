//! Resource definitions for the engine
//!
//! This module contains all global resources used by the engine systems.
//! Resources are singleton data that can be accessed by any system.

use bevy::prelude::*;
use std::time::Duration;

use crate::config::tank;
use crate::tauri_bridge::shared_state::{
    SharedFrameBuffer, SharedPerfStats, SharedPointerInput, SharedSelection, SharedViewport,
};

// =============================================================================
// Tank
// =============================================================================

/// Axis-aligned bounds of the aquarium interior
///
/// All entities are kept within the half extents minus a margin; fish
/// reflect off the implied planes, bubbles recycle across them.
#[derive(Resource, Clone, Copy)]
pub struct TankBounds {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl TankBounds {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    pub fn half_depth(&self) -> f32 {
        self.depth / 2.0
    }

    /// Y coordinate of the tank floor
    pub fn floor_y(&self) -> f32 {
        -self.half_height()
    }
}

impl Default for TankBounds {
    fn default() -> Self {
        Self {
            width: tank::WIDTH,
            height: tank::HEIGHT,
            depth: tank::DEPTH,
        }
    }
}

// =============================================================================
// Camera Control
// =============================================================================

/// Orbit camera state for spherical coordinate camera control
#[derive(Resource)]
pub struct OrbitCameraState {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians), clamped to avoid gimbal lock
    pub pitch: f32,
    /// Distance from the camera to the center point
    pub distance: f32,
    /// The point the camera orbits around
    pub center: Vec3,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.25, // Slight downward angle
            distance: 12.0,
            center: Vec3::ZERO,
        }
    }
}

// =============================================================================
// Bridge Handles
// =============================================================================

/// Resource to hold shared pointer input in the engine
#[derive(Resource)]
pub struct PointerInputRes(pub SharedPointerInput);

/// Shared frame buffer resource
#[derive(Resource)]
pub struct FrameBufferRes(pub SharedFrameBuffer);

/// Shared viewport state resource
#[derive(Resource)]
pub struct ViewportRes(pub SharedViewport);

/// Shared selection slot resource
#[derive(Resource)]
pub struct SelectionRes(pub SharedSelection);

/// Shared performance statistics resource
#[derive(Resource)]
pub struct PerfStatsRes(pub SharedPerfStats);

// =============================================================================
// Rendering
// =============================================================================

/// Handle to the offscreen render target texture
#[derive(Resource)]
pub struct RenderTargetHandle(pub Handle<Image>);

/// Mesh and material shared by every bubble, kept around so the trail
/// spawner can create more without touching the asset stores
#[derive(Resource)]
pub struct BubbleAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

// =============================================================================
// Frame Management
// =============================================================================

/// Counter for total frames rendered
#[derive(Resource, Default)]
pub struct FrameCount(pub u32);

/// Number of pre-roll frames to skip before starting output
#[derive(Resource, Default)]
pub struct PreRollFrames(pub u32);

/// Frame rate limiter to control output FPS
#[derive(Resource)]
pub struct FrameRateLimiter {
    pub last_frame_time: std::time::Instant,
    pub min_frame_interval: Duration,
}

impl FrameRateLimiter {
    pub fn new(target_fps: f64) -> Self {
        Self {
            last_frame_time: std::time::Instant::now(),
            min_frame_interval: Duration::from_secs_f64(1.0 / target_fps),
        }
    }
}

impl Default for FrameRateLimiter {
    fn default() -> Self {
        Self::new(60.0) // Default to 60 FPS
    }
}

// =============================================================================
// Performance Monitoring
// =============================================================================

/// Performance timing tracker for frame processing
#[derive(Resource, Default)]
pub struct FrameTimings {
    pub last_print_time: f64,
    pub frame_times: Vec<f64>,
}

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

use crossbeam_channel::{Receiver, Sender};

/// Receives frame data from the render world
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<Vec<u8>>);

/// Sends frame data to the main world
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<Vec<u8>>);
