//! Viewport resize handling
//!
//! Applies render-target resizes requested by the frontend. The camera
//! aspect follows the target image automatically; the GPU capture buffer is
//! replaced since its size depends on the target dimensions. Safe to run
//! before the scene exists: every missing piece is a guarded no-op.

use bevy::{
    prelude::*,
    render::{render_resource::Extent3d, renderer::RenderDevice},
};

use crate::engine::plugins::FrameCapturer;
use crate::engine::resources::{RenderTargetHandle, ViewportRes};

pub fn apply_viewport_resize(
    mut commands: Commands,
    viewport: Option<Res<ViewportRes>>,
    target: Option<Res<RenderTargetHandle>>,
    images: Option<ResMut<Assets<Image>>>,
    render_device: Option<Res<RenderDevice>>,
    capturers: Query<(Entity, &FrameCapturer)>,
) {
    let Some(viewport) = viewport else { return };

    // Not initialized yet: leave the request pending
    let (Some(target), Some(mut images), Some(render_device)) = (target, images, render_device)
    else {
        return;
    };

    let Some((width, height)) = take_pending_resize(&viewport) else {
        return;
    };

    let Some(image) = images.get_mut(&target.0) else {
        return;
    };

    let size = Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    image.resize(size);

    // The old staging buffer no longer matches the target; swap capturers
    for (entity, capturer) in capturers.iter() {
        capturer.disable();
        commands.entity(entity).despawn();
    }
    commands.spawn(FrameCapturer::new(target.0.clone(), size, &render_device));

    println!("[Engine] Render target resized to {}x{}", width, height);
}

/// Consume a pending resize request, if any
fn take_pending_resize(viewport: &ViewportRes) -> Option<(u32, u32)> {
    let mut guard = viewport.0 .0.lock().ok()?;
    if !guard.dirty {
        return None;
    }
    guard.dirty = false;
    Some((guard.width.max(1), guard.height.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tauri_bridge::shared_state::SharedViewport;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn resize_before_initialization_is_a_no_op() {
        // No viewport, no render target, no images: must not panic
        let mut world = World::new();
        world
            .run_system_once(apply_viewport_resize)
            .expect("system should run");
    }

    #[test]
    fn resize_request_stays_pending_until_target_exists() {
        let shared = SharedViewport::default();
        {
            let mut vp = shared.0.lock().unwrap();
            vp.width = 1024;
            vp.height = 768;
            vp.dirty = true;
        }

        let mut world = World::new();
        world.insert_resource(ViewportRes(shared.clone()));
        world
            .run_system_once(apply_viewport_resize)
            .expect("system should run");

        // The engine had nothing to resize, so the request is untouched
        assert!(shared.0.lock().unwrap().dirty);
    }

    #[test]
    fn pending_resize_is_consumed_once() {
        let shared = SharedViewport::default();
        shared.0.lock().unwrap().dirty = true;

        let viewport = ViewportRes(shared);
        assert!(take_pending_resize(&viewport).is_some());
        assert!(take_pending_resize(&viewport).is_none());
    }
}
