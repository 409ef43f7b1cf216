//! Custom protocol handlers for efficient data transfer
//!
//! This module implements the `frame://` custom protocol for direct binary
//! transfer of render frames, bypassing Tauri's IPC JSON serialization.

use image::{codecs::jpeg::JpegEncoder, ImageBuffer, ImageEncoder, Rgba};
use tauri::http::Response as HttpResponse;

use super::shared_state::{SharedFrameBuffer, SharedPerfStats, SharedSelection, SharedViewport};
use crate::config::compression::JPEG_QUALITY;

type Response = HttpResponse<Vec<u8>>;

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.jpg`: JPEG-compressed frame (~50-100KB)
/// - `frame.raw`: Raw RGBA frame
/// - `stats`: Performance statistics as JSON
/// - `selection`: Currently selected fish as JSON (`null` when none)
pub fn handle_frame_protocol(
    uri_path: &str,
    buffer: &SharedFrameBuffer,
    viewport: &SharedViewport,
    selection: &SharedSelection,
    perf_stats: &SharedPerfStats,
) -> Response {
    let resource = uri_path.trim_start_matches('/');

    match resource {
        // JPEG compressed frame - much smaller data size!
        "frame" | "frame.jpg" => handle_jpeg_frame(buffer, viewport),

        // Raw RGBA frame (for comparison/debugging)
        "frame.raw" => handle_raw_frame(buffer, viewport),

        // Performance stats as JSON
        "stats" => handle_stats(perf_stats),

        // Selected fish as JSON
        "selection" => handle_selection(selection),

        _ => HttpResponse::builder()
            .status(404)
            .header("Content-Type", "text/plain")
            .body("Not Found".as_bytes().to_vec())
            .unwrap(),
    }
}

/// Handle JPEG-compressed frame request
fn handle_jpeg_frame(buffer: &SharedFrameBuffer, viewport: &SharedViewport) -> Response {
    let (width, height) = current_size(viewport);
    let guard = buffer.0.lock().unwrap();

    match &*guard {
        Some(rgba_data) if rgba_data.len() == (width * height * 4) as usize => {
            let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
                match ImageBuffer::from_raw(width, height, rgba_data.clone()) {
                    Some(img) => img,
                    None => return not_ready(),
                };

            // Convert RGBA to RGB for JPEG (no alpha channel)
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

            // Encode to JPEG with quality setting
            let mut jpeg_data = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY);
            if encoder
                .write_image(rgb_img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
                .is_err()
            {
                return not_ready();
            }

            frame_response(jpeg_data, "image/jpeg", width, height)
        }
        // A stale buffer right after a resize is served as not-ready
        _ => not_ready(),
    }
}

/// Handle raw RGBA frame request
fn handle_raw_frame(buffer: &SharedFrameBuffer, viewport: &SharedViewport) -> Response {
    let (width, height) = current_size(viewport);
    let guard = buffer.0.lock().unwrap();

    match &*guard {
        Some(rgba_data) => frame_response(
            rgba_data.clone(),
            "application/octet-stream",
            width,
            height,
        ),
        None => not_ready(),
    }
}

/// Handle performance stats request
fn handle_stats(perf_stats: &SharedPerfStats) -> Response {
    let guard = perf_stats.0.lock().unwrap();
    let json = serde_json::to_vec(&*guard).unwrap_or_default();
    json_response(json)
}

/// Handle selection info request
fn handle_selection(selection: &SharedSelection) -> Response {
    let guard = selection.0.lock().unwrap();
    let json = serde_json::to_vec(&*guard).unwrap_or_default();
    json_response(json)
}

fn current_size(viewport: &SharedViewport) -> (u32, u32) {
    let vp = viewport.0.lock().unwrap();
    (vp.width, vp.height)
}

fn frame_response(body: Vec<u8>, content_type: &str, width: u32, height: u32) -> Response {
    HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", width.to_string())
        .header("X-Frame-Height", height.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)
        .unwrap()
}

fn json_response(json: Vec<u8>) -> Response {
    HttpResponse::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(json)
        .unwrap()
}

fn not_ready() -> Response {
    HttpResponse::builder()
        .status(503)
        .header("Content-Type", "text/plain")
        .body("Frame not ready".as_bytes().to_vec())
        .unwrap()
}
