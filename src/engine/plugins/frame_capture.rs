//! GPU-to-CPU frame capture
//!
//! A render-graph node scheduled after the camera driver copies the offscreen
//! render target into a mappable buffer; a render-world system then maps the
//! buffer and ships the bytes to the main world over a crossbeam channel.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bevy::{
    prelude::*,
    render::{
        graph::CameraDriverLabel,
        render_asset::RenderAssets,
        render_graph::{self, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel},
        render_resource::{
            Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, MapMode,
            PollType, TexelCopyBufferInfo, TexelCopyBufferLayout,
        },
        renderer::{RenderContext, RenderDevice, RenderQueue},
        texture::GpuImage,
        Extract, ExtractSchedule, Render, RenderApp, RenderSet,
    },
};

use crate::engine::resources::{MainWorldReceiver, RenderWorldSender};

/// Plugin wiring the capture node and readback system into the render app
pub struct FrameCapturePlugin;

impl Plugin for FrameCapturePlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = crossbeam_channel::unbounded();

        let render_app = app
            .insert_resource(MainWorldReceiver(receiver))
            .sub_app_mut(RenderApp);

        let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
        graph.add_node(FrameCaptureLabel, FrameCaptureDriver);
        graph.add_node_edge(CameraDriverLabel, FrameCaptureLabel);

        render_app
            .insert_resource(RenderWorldSender(sender))
            .add_systems(ExtractSchedule, capture_extract)
            .add_systems(Render, readback_capture_buffer.after(RenderSet::Render));
    }
}

/// Captures frames from the render target it points at
///
/// Spawned once at scene setup and replaced whenever the viewport resizes,
/// since the staging buffer size depends on the target dimensions.
#[derive(Clone, Component)]
pub struct FrameCapturer {
    buffer: Buffer,
    enabled: Arc<AtomicBool>,
    src_image: Handle<Image>,
}

impl FrameCapturer {
    pub fn new(src_image: Handle<Image>, size: Extent3d, render_device: &RenderDevice) -> Self {
        let padded_bytes_per_row =
            RenderDevice::align_copy_bytes_per_row((size.width * 4) as usize) as u64;

        let buffer = render_device.create_buffer(&BufferDescriptor {
            label: Some("frame_capture_buffer"),
            size: padded_bytes_per_row * size.height as u64,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            enabled: Arc::new(AtomicBool::new(true)),
            src_image,
        }
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Extracted copy of every active capturer, refreshed each frame
#[derive(Clone, Default, Resource, Deref, DerefMut)]
struct FrameCapturers(Vec<FrameCapturer>);

fn capture_extract(mut commands: Commands, capturers: Extract<Query<&FrameCapturer>>) {
    commands.insert_resource(FrameCapturers(capturers.iter().cloned().collect()));
}

/// Render graph label for the capture node
#[derive(Debug, PartialEq, Eq, Clone, Hash, RenderLabel)]
struct FrameCaptureLabel;

/// Render graph node copying the target texture into the staging buffer
#[derive(Default)]
struct FrameCaptureDriver;

impl render_graph::Node for FrameCaptureDriver {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(capturers) = world.get_resource::<FrameCapturers>() else {
            return Ok(());
        };
        let Some(gpu_images) = world.get_resource::<RenderAssets<GpuImage>>() else {
            return Ok(());
        };

        for capturer in capturers.iter().filter(|c| c.enabled()) {
            let Some(src_image) = gpu_images.get(&capturer.src_image) else {
                continue;
            };

            let mut encoder = render_context
                .render_device()
                .create_command_encoder(&CommandEncoderDescriptor::default());

            let padded_bytes_per_row = RenderDevice::align_copy_bytes_per_row(
                (src_image.size.width * 4) as usize,
            ) as u32;

            encoder.copy_texture_to_buffer(
                src_image.texture.as_image_copy(),
                TexelCopyBufferInfo {
                    buffer: &capturer.buffer,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row),
                        rows_per_image: None,
                    },
                },
                src_image.size,
            );

            let render_queue = world.resource::<RenderQueue>();
            render_queue.submit(std::iter::once(encoder.finish()));
        }

        Ok(())
    }
}

/// Map the staging buffer and forward its contents to the main world
fn readback_capture_buffer(
    capturers: Res<FrameCapturers>,
    render_device: Res<RenderDevice>,
    sender: Res<RenderWorldSender>,
) {
    for capturer in capturers.iter().filter(|c| c.enabled()) {
        let buffer_slice = capturer.buffer.slice(..);

        let (map_tx, map_rx) = crossbeam_channel::bounded(1);
        buffer_slice.map_async(MapMode::Read, move |result| match result {
            Ok(_) => map_tx.send(()).expect("Failed to send map update"),
            Err(err) => panic!("Failed to map frame capture buffer: {err}"),
        });

        render_device
            .poll(PollType::Wait)
            .expect("Failed to poll render device");
        map_rx.recv().expect("Failed to receive map_async result");

        let _ = sender.send(buffer_slice.get_mapped_range().to_vec());
        capturer.buffer.unmap();
    }
}
