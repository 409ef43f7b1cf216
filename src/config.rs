//! Configuration constants for the aquarium
//!
//! This module contains all configurable parameters: tank dimensions,
//! simulation tuning, render resolution, frame rates and bridge settings.

/// Default width of the offscreen render target in pixels
pub const RENDER_WIDTH: u32 = 800;

/// Default height of the offscreen render target in pixels
pub const RENDER_HEIGHT: u32 = 600;

/// Target frames per second for the engine loop
pub const TARGET_FPS: f64 = 60.0;

/// Number of pre-roll frames to skip before starting output
/// This allows the scene to fully load and stabilize
pub const PRE_ROLL_FRAMES: u32 = 30;

/// Device pixel ratio cap when converting logical viewport sizes
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Tank geometry (world units)
pub mod tank {
    /// Interior width of the aquarium along X
    pub const WIDTH: f32 = 10.0;

    /// Interior height of the aquarium along Y
    pub const HEIGHT: f32 = 6.0;

    /// Interior depth of the aquarium along Z
    pub const DEPTH: f32 = 6.0;

    /// Thickness of the glass walls
    pub const WALL_THICKNESS: f32 = 0.1;

    /// Inset from each half-extent approximating half a fish body,
    /// keeps fish from clipping through the glass
    pub const MARGIN: f32 = 0.5;
}

/// Fish motion tuning
pub mod fish {
    /// Velocity scale applied on top of per-fish velocity vectors
    pub const SPEED_MULTIPLIER: f32 = 50.0;

    /// Per-frame blend factor for smoothing yaw toward the travel direction
    pub const YAW_SMOOTHING: f32 = 0.1;

    /// Fish closer than this repel each other
    pub const MIN_SEPARATION: f32 = 1.0;

    /// Velocity increment applied to each fish of a too-close pair
    pub const SEPARATION_NUDGE: f32 = 0.004;

    /// Position offset pushing a fish out of an overlapping obstacle
    pub const OBSTACLE_NUDGE: f32 = 0.05;

    /// Half-extent of a unit-scale fish used for obstacle overlap tests
    pub const HALF_SIZE: f32 = 0.5;

    /// Tail flutter frequency (radians per second)
    pub const TAIL_FLUTTER_SPEED: f32 = 8.0;

    /// Maximum tail deflection (radians)
    pub const TAIL_FLUTTER_AMPLITUDE: f32 = 0.35;
}

/// Bubble field tuning
pub mod bubbles {
    /// Bubbles created at startup
    pub const INITIAL_COUNT: usize = 20;

    /// Hard cap on bubbles alive at once (startup field plus fish trails)
    pub const MAX_COUNT: usize = 40;

    /// Minimum rise speed (units per second)
    pub const RISE_MIN: f32 = 0.6;

    /// Maximum rise speed (units per second)
    pub const RISE_MAX: f32 = 1.5;

    /// Maximum horizontal drift magnitude per axis (units per second)
    pub const DRIFT_MAX: f32 = 0.12;

    /// Fraction of the tank footprint bubbles respawn within
    pub const SPAWN_AREA: f32 = 0.8;

    /// Per-fish chance each frame of releasing a trail bubble
    pub const TRAIL_CHANCE: f32 = 0.01;

    /// Bubble sphere radius
    pub const RADIUS: f32 = 0.05;
}

/// Seaweed sway tuning
pub mod seaweed {
    /// Number of seaweed blades planted at startup
    pub const BLADE_COUNT: usize = 4;

    /// Minimum sway speed (radians per second)
    pub const SWAY_SPEED_MIN: f32 = 0.6;

    /// Maximum sway speed (radians per second)
    pub const SWAY_SPEED_MAX: f32 = 1.4;

    /// Maximum sway deflection (radians)
    pub const SWAY_AMPLITUDE: f32 = 0.25;
}

/// Camera control settings
pub mod camera {
    /// Rotation speed multiplier for mouse drag
    pub const ROTATION_SPEED: f32 = 0.005;

    /// Zoom speed multiplier for scroll wheel
    pub const ZOOM_SPEED: f32 = 0.5;

    /// Minimum camera distance from center point
    pub const MIN_DISTANCE: f32 = 4.0;

    /// Maximum camera distance from center point
    pub const MAX_DISTANCE: f32 = 30.0;

    /// Maximum pitch angle (radians) to prevent camera flipping
    pub const MAX_PITCH: f32 = 1.5;

    /// Minimum pitch angle (radians) to prevent camera flipping
    pub const MIN_PITCH: f32 = -1.5;
}

/// Performance monitoring settings
pub mod performance {
    /// Interval for printing performance stats (seconds)
    pub const STATS_PRINT_INTERVAL: f64 = 2.0;

    /// Number of frame timing samples to keep for averaging
    pub const FRAME_TIMING_SAMPLES: usize = 60;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}
