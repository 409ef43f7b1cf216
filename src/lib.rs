//! Tauri Aquarium: a 3D aquarium rendered headlessly with Bevy
//!
//! Bevy runs in a background thread with no window and renders the tank —
//! animated fish, decor, bubbles, translucent glass — to an offscreen
//! texture. Frames travel GPU texture -> buffer -> CPU channel -> Tauri
//! frontend, which displays them on a canvas, forwards pointer input for
//! orbit control and pick/selection, and shows the selected fish in an
//! info panel.
//!
//! # Module Structure
//!
//! - `config`: Configuration constants and tuning
//! - `tauri_bridge`: Bridge layer between Tauri and the engine
//!   - `shared_state`: Thread-safe data structures
//!   - `commands`: Tauri command handlers
//!   - `protocol`: Custom protocol handlers
//! - `engine`: Bevy integration
//!   - `components`: ECS components
//!   - `resources`: Global resources
//!   - `plugins`: Custom plugins
//!   - `systems`: Simulation and rendering systems
//!   - `app`: Application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Module declarations
pub mod config;
pub mod engine;
pub mod tauri_bridge;

use std::{thread, time::Duration};
use tauri_bridge::{
    SharedFrameBuffer, SharedPerfStats, SharedPointerInput, SharedSelection, SharedViewport,
};

/// Main entry point for the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    println!("[Tauri] Starting...");

    // Create shared state
    let buffer = SharedFrameBuffer::default();
    let perf_stats = SharedPerfStats::default();
    let pointer_input = SharedPointerInput::default();
    let viewport = SharedViewport::default();
    let selection = SharedSelection::default();

    // Start the engine in a background thread
    engine::start_engine(
        buffer.clone(),
        perf_stats.clone(),
        pointer_input.clone(),
        viewport.clone(),
        selection.clone(),
    );

    // Wait for the engine to initialize
    thread::sleep(Duration::from_millis(1000));

    // Clone for the custom protocol handler
    let protocol_buffer = buffer.clone();
    let protocol_viewport = viewport.clone();
    let protocol_selection = selection.clone();
    let protocol_perf_stats = perf_stats.clone();

    // Build and run Tauri application
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(buffer)
        .manage(perf_stats)
        .manage(pointer_input)
        .manage(viewport)
        .manage(selection)
        // Register custom protocol "frame://" for direct binary transfer
        // This bypasses Tauri IPC JSON serialization completely!
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let buffer = protocol_buffer.clone();
            let viewport = protocol_viewport.clone();
            let selection = protocol_selection.clone();
            let perf_stats = protocol_perf_stats.clone();

            // Handle the request in a separate thread to avoid blocking
            std::thread::spawn(move || {
                let path = request.uri().path();
                let response = tauri_bridge::protocol::handle_frame_protocol(
                    path,
                    &buffer,
                    &viewport,
                    &selection,
                    &perf_stats,
                );
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            tauri_bridge::commands::get_frame,
            tauri_bridge::commands::get_render_size,
            tauri_bridge::commands::get_performance_stats,
            tauri_bridge::commands::send_pointer_input,
            tauri_bridge::commands::send_click,
            tauri_bridge::commands::set_viewport,
            tauri_bridge::commands::get_selection
        ])
        .run(tauri::generate_context!())
        .expect("Tauri error");
}
