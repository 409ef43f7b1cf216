//! Shared state structures for communication between Tauri and the engine
//!
//! This module defines thread-safe data structures that allow bidirectional
//! communication between the Tauri frontend and the Bevy render backend.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::config::{RENDER_HEIGHT, RENDER_WIDTH};

// =============================================================================
// Frame Buffer
// =============================================================================

/// Thread-safe RGBA frame buffer shared between the engine and Tauri
/// Stores raw RGBA8 pixel data (4 bytes per pixel)
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<Vec<u8>>>>);

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Pointer Input
// =============================================================================

/// Pointer input state received from frontend
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct PointerInput {
    /// Accumulated X movement delta
    pub delta_x: f32,
    /// Accumulated Y movement delta
    pub delta_y: f32,
    /// Accumulated scroll wheel delta
    pub scroll_delta: f32,
    /// Left mouse button is pressed
    pub left_button: bool,
    /// Right mouse button is pressed
    pub right_button: bool,
    /// Queued click positions in render-target pixel coordinates,
    /// drained by the picking system each frame
    pub clicks: Vec<[f32; 2]>,
}

/// Thread-safe pointer input shared between Tauri and the engine
#[derive(Clone, Default)]
pub struct SharedPointerInput(pub Arc<Mutex<PointerInput>>);

// =============================================================================
// Viewport
// =============================================================================

/// Render target size requested by the frontend
#[derive(Serialize, Deserialize, Clone)]
pub struct ViewportState {
    /// Current physical width of the render target
    pub width: u32,
    /// Current physical height of the render target
    pub height: u32,
    /// Set by the resize command, cleared once the engine applies it
    pub dirty: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            dirty: false,
        }
    }
}

/// Thread-safe viewport state shared between Tauri and the engine
#[derive(Clone, Default)]
pub struct SharedViewport(pub Arc<Mutex<ViewportState>>);

// =============================================================================
// Selection
// =============================================================================

/// Attributes of the currently selected fish, published for the info panel
#[derive(Serialize, Deserialize, Clone)]
pub struct FishInfo {
    pub name: String,
    /// Base color as a lowercase hex string, e.g. "4da6ff"
    pub color: String,
    pub speed: f32,
    pub position: [f32; 3],
}

/// Thread-safe single-slot selection shared between the engine and Tauri
/// `None` means no fish is selected and the info panel should be hidden
#[derive(Clone, Default)]
pub struct SharedSelection(pub Arc<Mutex<Option<FishInfo>>>);

// =============================================================================
// Performance Statistics
// =============================================================================

/// Performance statistics for debugging and monitoring
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct PerformanceStats {
    // Backend (engine) timings
    pub gpu_transfer_ms: f64,
    pub data_processing_ms: f64,
    pub frame_encoding_ms: f64,
    pub engine_fps: f64,
    pub frame_count: u32,
    pub data_size_kb: f64,
    // Tauri command timings
    pub tauri_get_frame_ms: f64,
    pub tauri_serialize_ms: f64,
}

/// Thread-safe performance statistics
#[derive(Clone, Default)]
pub struct SharedPerfStats(pub Arc<Mutex<PerformanceStats>>);
