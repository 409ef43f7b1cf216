//! Engine application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration and system scheduling.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    window::ExitCondition,
};
use std::thread;
use std::time::Duration;

use crate::config::{PRE_ROLL_FRAMES, TARGET_FPS};
use crate::engine::plugins::FrameCapturePlugin;
use crate::engine::resources::*;
use crate::engine::systems::*;
use crate::tauri_bridge::shared_state::{
    SharedFrameBuffer, SharedPerfStats, SharedPointerInput, SharedSelection, SharedViewport,
};

/// Create and configure the engine application
pub fn create_app(
    frame_buffer: SharedFrameBuffer,
    perf_stats: SharedPerfStats,
    pointer_input: SharedPointerInput,
    viewport: SharedViewport,
    selection: SharedSelection,
) -> App {
    let mut app = App::new();

    // Use DefaultPlugins but configure for headless operation
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // Add schedule runner for controlled frame rate
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    // Add custom plugins
    app.add_plugins(FrameCapturePlugin);

    // Register systems
    app.add_systems(Startup, setup_scene);
    app.add_systems(
        Update,
        (
            apply_viewport_resize,
            update_camera_from_input,
            (swim_fish, school_separation, avoid_obstacles).chain(),
            animate_fish_tails,
            rise_bubbles,
            spawn_trail_bubbles,
            sway_seaweed,
            pulse_light,
            handle_clicks,
        ),
    );
    app.add_systems(Last, extract_and_process_frame);

    // Insert resources
    app.insert_resource(FrameBufferRes(frame_buffer));
    app.insert_resource(PerfStatsRes(perf_stats));
    app.insert_resource(PointerInputRes(pointer_input));
    app.insert_resource(ViewportRes(viewport));
    app.insert_resource(SelectionRes(selection));
    app.insert_resource(TankBounds::default());
    app.insert_resource(OrbitCameraState::default());
    app.insert_resource(FrameCount::default());
    app.insert_resource(PreRollFrames(PRE_ROLL_FRAMES));
    app.insert_resource(FrameTimings::default());
    app.insert_resource(FrameRateLimiter::new(TARGET_FPS));

    println!("[Engine] App configured (headless mode with GPU-CPU pipeline)");
    app
}

/// Start the engine in a background thread
pub fn start_engine(
    frame_buffer: SharedFrameBuffer,
    perf_stats: SharedPerfStats,
    pointer_input: SharedPointerInput,
    viewport: SharedViewport,
    selection: SharedSelection,
) {
    thread::spawn(move || {
        println!("[Engine] Thread started");
        let mut app = create_app(frame_buffer, perf_stats, pointer_input, viewport, selection);
        println!("[Engine] Running render loop...");
        app.run();
    });
}
