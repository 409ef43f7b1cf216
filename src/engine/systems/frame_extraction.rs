//! Frame extraction system
//!
//! Pulls rendered frames out of the render world, strips GPU row padding
//! and publishes the RGBA bytes to the shared frame buffer for the
//! frontend.

use bevy::{prelude::*, render::renderer::RenderDevice, time::Time};

use crate::config::performance::*;
use crate::engine::resources::{
    FrameBufferRes, FrameCount, FrameRateLimiter, FrameTimings, MainWorldReceiver, PerfStatsRes,
    PreRollFrames, ViewportRes,
};

/// Extract and process frame data from the render pipeline
pub fn extract_and_process_frame(
    receiver: Res<MainWorldReceiver>,
    buffer: Option<Res<FrameBufferRes>>,
    viewport: Option<Res<ViewportRes>>,
    perf_stats: Option<Res<PerfStatsRes>>,
    mut count: ResMut<FrameCount>,
    mut pre_roll: ResMut<PreRollFrames>,
    mut timings: ResMut<FrameTimings>,
    mut frame_limiter: ResMut<FrameRateLimiter>,
    time: Res<Time>,
) {
    let Some(b) = buffer else { return };

    // Wait for scene to be fully rendered
    if pre_roll.0 > 0 {
        while receiver.try_recv().is_ok() {}
        pre_roll.0 -= 1;
        if pre_roll.0 % 10 == 0 && pre_roll.0 > 0 {
            println!("[Engine] Pre-roll frames remaining: {}", pre_roll.0);
        }
        return;
    }

    // Frame rate limiting - skip if not enough time has passed
    let now = std::time::Instant::now();
    let elapsed = now.duration_since(frame_limiter.last_frame_time);
    if elapsed < frame_limiter.min_frame_interval {
        // Drain the receiver but don't process - too early for next frame
        while receiver.try_recv().is_ok() {}
        return;
    }
    frame_limiter.last_frame_time = now;

    let (width, height) = match &viewport {
        Some(vp) => match vp.0 .0.lock() {
            Ok(guard) => (guard.width, guard.height),
            Err(_) => return,
        },
        None => return,
    };

    let frame_start = std::time::Instant::now();

    // Try to receive latest frame data from render world
    let receive_start = std::time::Instant::now();
    let mut image_data = Vec::new();
    while let Ok(data) = receiver.try_recv() {
        image_data = data;
    }
    let receive_time = receive_start.elapsed().as_secs_f64() * 1000.0;

    if image_data.is_empty() {
        return;
    }

    // Remove row padding and store raw RGBA data
    let process_start = std::time::Instant::now();
    let Some(rgba) = remove_row_padding(&image_data, width, height) else {
        return;
    };
    let process_time = process_start.elapsed().as_secs_f64() * 1000.0;
    let data_size = rgba.len();

    // A frame captured just before a resize has stale dimensions; drop it
    if data_size != (width * height * 4) as usize {
        return;
    }

    if let Ok(mut guard) = b.0 .0.lock() {
        *guard = Some(rgba);
        count.0 += 1;

        let total_time = frame_start.elapsed().as_secs_f64() * 1000.0;
        timings.frame_times.push(total_time);

        // Keep only last N samples for averaging
        if timings.frame_times.len() > FRAME_TIMING_SAMPLES {
            timings.frame_times.remove(0);
        }

        // Update performance stats
        if let Some(perf_res) = &perf_stats {
            if let Ok(mut stats) = perf_res.0 .0.lock() {
                stats.gpu_transfer_ms = receive_time;
                stats.data_processing_ms = process_time;
                stats.frame_encoding_ms = total_time;
                stats.frame_count = count.0;
                stats.data_size_kb = data_size as f64 / 1024.0;

                // Calculate FPS from frame times
                if !timings.frame_times.is_empty() {
                    let avg_time = timings.frame_times.iter().sum::<f64>()
                        / timings.frame_times.len() as f64;
                    stats.engine_fps = if avg_time > 0.0 { 1000.0 / avg_time } else { 0.0 };
                }
            }
        }

        // Print detailed stats periodically
        let current_time = time.elapsed_secs_f64();
        if current_time - timings.last_print_time >= STATS_PRINT_INTERVAL {
            let avg_time =
                timings.frame_times.iter().sum::<f64>() / timings.frame_times.len() as f64;
            let max_time = timings.frame_times.iter().cloned().fold(0.0f64, f64::max);
            let min_time = timings.frame_times.iter().cloned().fold(f64::MAX, f64::min);

            println!(
                "[Engine] Frame {} | Receive: {:.2}ms | Process: {:.2}ms | Total: {:.2}ms | Avg: {:.2}ms (Min: {:.2}ms, Max: {:.2}ms) | Size: {:.1}KB",
                count.0,
                receive_time,
                process_time,
                total_time,
                avg_time,
                min_time,
                max_time,
                data_size as f64 / 1024.0
            );
            timings.last_print_time = current_time;
        }
    };
}

/// Remove GPU buffer row padding alignment, returning pure RGBA data
fn remove_row_padding(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }

    // Handle row padding alignment
    let row_bytes = width as usize * 4;
    let aligned_row_bytes = RenderDevice::align_copy_bytes_per_row(row_bytes);

    let rgba_data = if row_bytes == aligned_row_bytes {
        // No padding, return as-is
        data.to_vec()
    } else {
        // Remove padding from each row
        data.chunks(aligned_row_bytes)
            .take(height as usize)
            .flat_map(|row| &row[..row_bytes.min(row.len())])
            .cloned()
            .collect()
    };

    Some(rgba_data)
}

#[cfg(test)]
mod tests {
    use super::remove_row_padding;

    #[test]
    fn empty_frames_are_rejected() {
        assert!(remove_row_padding(&[], 4, 4).is_none());
    }

    #[test]
    fn aligned_rows_pass_through_unchanged() {
        // 64 pixels per row = 256 bytes, already at the alignment boundary
        let data = vec![7u8; 256 * 2];
        let rgba = remove_row_padding(&data, 64, 2).unwrap();
        assert_eq!(rgba, data);
    }

    #[test]
    fn padded_rows_are_stripped() {
        // 1 pixel per row (4 bytes) padded to 256-byte alignment
        let mut data = vec![0u8; 256 * 2];
        data[0..4].copy_from_slice(&[1, 2, 3, 4]);
        data[256..260].copy_from_slice(&[5, 6, 7, 8]);

        let rgba = remove_row_padding(&data, 1, 2).unwrap();
        assert_eq!(rgba, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
