// src/lib.rs
//
// Straight lane-line detection and overlay for single road video frames.

pub mod compositor;
pub mod config;
pub mod debug;
pub mod edges;
pub mod lane_fitter;
pub mod pipeline;
pub mod region;
pub mod segments;
pub mod types;
pub mod video_processor;

pub use pipeline::{AnnotatedFrames, LaneDetector, ProcessedFrame};
pub use types::{Config, LaneDetection, LaneLine, LanePair, LineModel, Segment};
pub use video_processor::{FrameSource, VideoProcessor, VideoReader};
