//! Engine systems
//!
//! All the systems that operate on aquarium entities and resources,
//! from scene construction through per-frame simulation to frame output.

pub mod animation;
pub mod bubbles;
pub mod camera;
pub mod fish;
pub mod frame_extraction;
pub mod picking;
pub mod scene;
pub mod viewport;

pub use animation::{pulse_light, sway_seaweed};
pub use bubbles::{rise_bubbles, spawn_trail_bubbles};
pub use camera::update_camera_from_input;
pub use fish::{animate_fish_tails, avoid_obstacles, school_separation, swim_fish};
pub use frame_extraction::extract_and_process_frame;
pub use picking::handle_clicks;
pub use scene::setup_scene;
pub use viewport::apply_viewport_resize;
