// src/pipeline.rs
//
// raw frame → edges → ROI mask → Hough segments → lane fit → composite
//
// Every stage is a pure function of its input. `LaneDetector` carries no
// state between frames, so one instance can serve any number of videos.

use crate::compositor;
use crate::edges::{check_frame, extract_edges};
use crate::lane_fitter::fit_lanes;
use crate::region::region_of_interest;
use crate::segments::detect_segments;
use crate::types::LaneDetection;
use crate::video_processor::FrameSource;
use anyhow::{Context, Result};
use opencv::{core::Mat, prelude::*};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct LaneDetector;

impl LaneDetector {
    pub fn new() -> Self {
        Self
    }

    /// Masked edge map for a frame (first two stages).
    pub fn masked_edges(&self, frame: &Mat) -> Result<Mat> {
        let edges = extract_edges(frame)?;
        region_of_interest(&edges)
    }

    /// Run every stage except compositing.
    pub fn detect(&self, frame: &Mat) -> Result<LaneDetection> {
        let masked = self.masked_edges(frame)?;
        let segments = detect_segments(&masked)?;
        let lanes = fit_lanes(frame.size()?, &segments);

        debug!(
            "{} segments → left: {}, right: {}",
            segments.len(),
            lanes.left.is_some(),
            lanes.right.is_some()
        );

        Ok(LaneDetection { segments, lanes })
    }

    /// Annotated copy of `frame` with the detected lane lines overlaid.
    pub fn process_frame(&self, frame: &Mat) -> Result<Mat> {
        self.process_detailed(frame).map(|(_, annotated)| annotated)
    }

    /// Like [`process_frame`](Self::process_frame), also returning what was
    /// detected along the way.
    pub fn process_detailed(&self, frame: &Mat) -> Result<(LaneDetection, Mat)> {
        check_frame(frame)?;
        let detection = self.detect(frame)?;
        let annotated = compositor::composite(frame, &detection.lanes)?;
        Ok((detection, annotated))
    }

    /// Lazily annotate every frame `source` yields.
    pub fn annotate<S: FrameSource>(&self, source: S) -> AnnotatedFrames<S> {
        AnnotatedFrames {
            detector: *self,
            source,
            index: 0,
            done: false,
        }
    }
}

/// Result of pushing one source frame through the pipeline.
pub struct ProcessedFrame {
    /// Zero-based position in the source.
    pub index: u64,
    pub detection: LaneDetection,
    pub annotated: Mat,
}

/// One annotated frame per source frame, until the source runs dry.
///
/// Callers cancel by simply not pulling further items. A source error ends
/// the sequence after it is yielded; a per-frame processing error is yielded
/// and iteration carries on with the next frame.
pub struct AnnotatedFrames<S> {
    detector: LaneDetector,
    source: S,
    index: u64,
    done: bool,
}

impl<S> AnnotatedFrames<S> {
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: FrameSource> Iterator for AnnotatedFrames<S> {
    type Item = Result<ProcessedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.next_frame() {
            Ok(Some(frame)) => {
                let index = self.index;
                self.index += 1;
                let result = self.detector.process_detailed(&frame).map(|(detection, annotated)| {
                    ProcessedFrame {
                        index,
                        detection,
                        annotated,
                    }
                });
                Some(result.with_context(|| format!("frame {}", index)))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
