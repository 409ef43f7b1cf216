//! Engine plugins
//!
//! Custom Bevy plugins that extend the engine's functionality for our
//! specific use case.

pub mod frame_capture;

pub use frame_capture::{FrameCapturePlugin, FrameCapturer};
