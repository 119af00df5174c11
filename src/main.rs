// src/main.rs

use anyhow::Result;
use lane_lines::debug::visualize_segments;
use lane_lines::{Config, LaneDetector, VideoProcessor};
use opencv::{highgui, prelude::*};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const QUIT_KEY: i32 = 'q' as i32;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Lane line overlay starting");
    if Path::new(&config_path).exists() {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("{} not found, running with default configuration", config_path);
    }

    let detector = LaneDetector::new();
    let video_processor = VideoProcessor::new(config.clone());
    let video_files = video_processor.find_video_files()?;

    if video_files.is_empty() {
        error!("No video files found at {}", config.video.input);
        return Ok(());
    }

    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        match process_video(video_path, &detector, &video_processor, &config) {
            Ok(stats) => {
                info!("✓ Video processed");
                info!("  Total frames: {}", stats.total_frames);
                info!(
                    "  Both lanes: {} ({:.1}%)",
                    stats.frames_with_both,
                    100.0 * stats.frames_with_both as f64 / stats.total_frames.max(1) as f64
                );
                info!("  Left only: {}", stats.frames_left_only);
                info!("  Right only: {}", stats.frames_right_only);
                info!("  No lanes: {}", stats.frames_without_lanes);
                if stats.frames_failed > 0 {
                    warn!("  Failed frames: {}", stats.frames_failed);
                }
                info!("  Processing speed: {:.1} FPS", stats.avg_fps);

                if stats.quit_requested {
                    info!("Quit requested, skipping remaining videos");
                    break;
                }
            }
            Err(e) => {
                error!("Failed to process video {}: {:#}", video_path.display(), e);
            }
        }
    }

    if config.video.display {
        highgui::destroy_all_windows()?;
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ProcessingStats {
    total_frames: u64,
    frames_with_both: u64,
    frames_left_only: u64,
    frames_right_only: u64,
    frames_without_lanes: u64,
    frames_failed: u64,
    avg_fps: f64,
    quit_requested: bool,
}

fn process_video(
    video_path: &Path,
    detector: &LaneDetector,
    video_processor: &VideoProcessor,
    config: &Config,
) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    let reader = video_processor.open_video(video_path)?;
    let mut writer =
        video_processor.create_writer(video_path, reader.width, reader.height, reader.fps)?;

    let mut stats = ProcessingStats::default();

    let mut frames = detector.annotate(reader);
    while let Some(processed) = frames.next() {
        stats.total_frames += 1;

        let processed = match processed {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping frame: {:#}", e);
                stats.frames_failed += 1;
                continue;
            }
        };

        let lanes = &processed.detection.lanes;
        match (lanes.left.is_some(), lanes.right.is_some()) {
            (true, true) => stats.frames_with_both += 1,
            (true, false) => stats.frames_left_only += 1,
            (false, true) => stats.frames_right_only += 1,
            (false, false) => stats.frames_without_lanes += 1,
        }

        let output = if config.debug.draw_segments {
            visualize_segments(&processed.annotated, &processed.detection.segments)?
        } else {
            processed.annotated
        };

        if let Some(w) = writer.as_mut() {
            w.write(&output)?;
        }

        if config.video.display {
            highgui::imshow(&config.video.window_name, &output)?;
            if highgui::wait_key(1)? & 0xFF == QUIT_KEY {
                stats.quit_requested = true;
                break;
            }
        }

        if stats.total_frames % 300 == 0 {
            info!(
                "  ... {} frames ({:.1}%)",
                stats.total_frames,
                frames.source().progress()
            );
        }
    }

    if let Some(mut w) = writer {
        w.release()?;
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    stats.avg_fps = stats.total_frames as f64 / elapsed.max(f64::EPSILON);

    Ok(stats)
}
