// src/types.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// RUNNER CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub video: VideoConfig,
    pub debug: DebugConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// A single video file, or a directory scanned recursively for videos
    pub input: String,
    pub output_dir: String,
    pub save_annotated: bool,
    pub display: bool,
    pub window_name: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            input: "test2.mp4".to_string(),
            output_dir: "output".to_string(),
            save_annotated: false,
            display: true,
            window_name: "result".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw raw Hough segments and the ROI outline over the annotated frame
    pub draw_segments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "lane_lines=info".to_string(),
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// A straight segment reported by the Hough transform, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// False for vertical segments, whose slope is undefined.
    pub fn slope_defined(&self) -> bool {
        self.x1 != self.x2
    }

    pub fn endpoints(&self) -> [(f64, f64); 2] {
        [
            (self.x1 as f64, self.y1 as f64),
            (self.x2 as f64, self.y2 as f64),
        ]
    }
}

/// `y = slope * x + intercept` in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LineModel {
    /// Solve for x at row `y`. `None` when the line is horizontal.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        if self.slope == 0.0 {
            return None;
        }
        Some((y - self.intercept) / self.slope)
    }
}

/// Renderable lane boundary, from the bottom row up to 60% of the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLine {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Left and right lane boundaries of one frame. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanePair {
    pub left: Option<LaneLine>,
    pub right: Option<LaneLine>,
}

impl LanePair {
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Present lines, left first.
    pub fn iter(&self) -> impl Iterator<Item = &LaneLine> {
        self.left.iter().chain(self.right.iter())
    }
}

/// Everything the pipeline inferred for one frame, before compositing.
#[derive(Debug, Clone, Default)]
pub struct LaneDetection {
    pub segments: Vec<Segment>,
    pub lanes: LanePair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_segment_has_no_slope() {
        assert!(!Segment::new(10, 0, 10, 50).slope_defined());
        assert!(Segment::new(10, 0, 11, 50).slope_defined());
    }

    #[test]
    fn test_horizontal_model_has_no_x() {
        let flat = LineModel {
            slope: 0.0,
            intercept: 200.0,
        };
        assert_eq!(flat.x_at(300.0), None);

        let model = LineModel {
            slope: -2.0,
            intercept: 600.0,
        };
        assert_eq!(model.x_at(400.0), Some(100.0));
    }

    #[test]
    fn test_lane_pair_iteration_order() {
        let left = LaneLine {
            x1: 100,
            y1: 480,
            x2: 200,
            y2: 288,
        };
        let right = LaneLine {
            x1: 500,
            y1: 480,
            x2: 400,
            y2: 288,
        };
        let pair = LanePair {
            left: Some(left),
            right: Some(right),
        };
        assert_eq!(pair.count(), 2);
        assert_eq!(pair.iter().copied().collect::<Vec<_>>(), vec![left, right]);

        let right_only = LanePair {
            left: None,
            right: Some(right),
        };
        assert_eq!(right_only.count(), 1);
        assert!(!right_only.is_empty());
        assert!(LanePair::default().is_empty());
    }
}
