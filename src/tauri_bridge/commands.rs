//! Tauri command handlers
//!
//! This module contains all the Tauri command functions that can be invoked
//! from the frontend JavaScript/TypeScript code.

use base64::{engine::general_purpose::STANDARD, Engine};
use tauri::State;

use super::shared_state::{
    FishInfo, FrameResponse, SharedFrameBuffer, SharedPerfStats, SharedPointerInput,
    SharedSelection, SharedViewport,
};
use crate::config::MAX_PIXEL_RATIO;

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(
    state: State<SharedFrameBuffer>,
    viewport: State<SharedViewport>,
    perf_state: State<SharedPerfStats>,
) -> Result<FrameResponse, String> {
    let cmd_start = std::time::Instant::now();

    let (width, height) = {
        let vp = viewport.0.lock().map_err(|e| e.to_string())?;
        (vp.width, vp.height)
    };

    let guard = state.0.lock().map_err(|e| e.to_string())?;
    match &*guard {
        Some(rgba_data) => {
            let data_fetch_time = cmd_start.elapsed().as_secs_f64() * 1000.0;

            // Measure Base64 encoding time
            let encode_start = std::time::Instant::now();
            let base64_data = STANDARD.encode(rgba_data);
            let encode_time = encode_start.elapsed().as_secs_f64() * 1000.0;

            // Update perf stats
            if let Ok(mut stats) = perf_state.0.lock() {
                stats.tauri_get_frame_ms = data_fetch_time;
                stats.tauri_serialize_ms = encode_time;
            }

            Ok(FrameResponse {
                data: base64_data,
                width,
                height,
            })
        }
        None => Err("No frame yet (scene still loading)".into()),
    }
}

/// Get the current render resolution
#[tauri::command]
pub fn get_render_size(viewport: State<SharedViewport>) -> Result<(u32, u32), String> {
    let vp = viewport.0.lock().map_err(|e| e.to_string())?;
    Ok((vp.width, vp.height))
}

/// Get performance statistics
#[tauri::command]
pub fn get_performance_stats(
    state: State<SharedPerfStats>,
) -> Result<super::shared_state::PerformanceStats, String> {
    let guard = state.0.lock().map_err(|e| e.to_string())?;
    Ok(guard.clone())
}

/// Receive pointer movement from frontend for orbit camera control
/// Input deltas are accumulated until consumed by the engine
#[tauri::command]
pub fn send_pointer_input(
    state: State<SharedPointerInput>,
    delta_x: f32,
    delta_y: f32,
    scroll_delta: f32,
    left_button: bool,
    right_button: bool,
) -> Result<(), String> {
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    // Accumulate deltas (will be cleared when the engine reads them)
    guard.delta_x += delta_x;
    guard.delta_y += delta_y;
    guard.scroll_delta += scroll_delta;
    // Button state is just the current state
    guard.left_button = left_button;
    guard.right_button = right_button;
    Ok(())
}

/// Queue a click for pick/selection, in render-target pixel coordinates
#[tauri::command]
pub fn send_click(state: State<SharedPointerInput>, x: f32, y: f32) -> Result<(), String> {
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    guard.clicks.push([x, y]);
    Ok(())
}

/// Request a render target resize from a logical viewport size
/// The device pixel ratio is capped to keep large displays affordable
#[tauri::command]
pub fn set_viewport(
    state: State<SharedViewport>,
    width: u32,
    height: u32,
    device_pixel_ratio: f32,
) -> Result<(), String> {
    let (phys_w, phys_h) = physical_size(width, height, device_pixel_ratio);
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    if guard.width != phys_w || guard.height != phys_h {
        guard.width = phys_w;
        guard.height = phys_h;
        guard.dirty = true;
    }
    Ok(())
}

/// Get the currently selected fish, if any
#[tauri::command]
pub fn get_selection(state: State<SharedSelection>) -> Result<Option<FishInfo>, String> {
    let guard = state.0.lock().map_err(|e| e.to_string())?;
    Ok(guard.clone())
}

/// Convert a logical size to a physical one with the pixel ratio capped
fn physical_size(width: u32, height: u32, device_pixel_ratio: f32) -> (u32, u32) {
    let ratio = device_pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO);
    let w = ((width as f32 * ratio) as u32).max(1);
    let h = ((height as f32 * ratio) as u32).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::physical_size;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(physical_size(800, 600, 3.0), (1600, 1200));
    }

    #[test]
    fn pixel_ratio_below_one_is_raised() {
        assert_eq!(physical_size(800, 600, 0.5), (800, 600));
    }

    #[test]
    fn zero_sizes_are_clamped_to_one() {
        assert_eq!(physical_size(0, 0, 1.0), (1, 1));
    }
}
