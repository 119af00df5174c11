// src/segments.rs

use crate::types::Segment;
use anyhow::{ensure, Context, Result};
use opencv::{
    core::{self, Mat, Vec4i, Vector},
    imgproc,
    prelude::*,
};
use std::f64::consts::PI;

const RHO: f64 = 1.0;
const THETA: f64 = PI / 180.0;
const VOTE_THRESHOLD: i32 = 50;
const MIN_LINE_LENGTH: f64 = 40.0;
const MAX_LINE_GAP: f64 = 5.0;

/// Probabilistic Hough transform over a masked edge map.
///
/// An empty result is a normal outcome, not an error.
pub fn detect_segments(edges: &Mat) -> Result<Vec<Segment>> {
    ensure!(
        edges.typ() == core::CV_8UC1,
        "segment detection needs a single-channel 8-bit edge map, got type {}",
        edges.typ()
    );

    let mut lines = Vector::<Vec4i>::new();
    imgproc::hough_lines_p(
        edges,
        &mut lines,
        RHO,
        THETA,
        VOTE_THRESHOLD,
        MIN_LINE_LENGTH,
        MAX_LINE_GAP,
    )
    .context("hough transform failed")?;

    Ok(lines
        .iter()
        .map(|l| {
            let [x1, y1, x2, y2] = l.0;
            Segment::new(x1, y1, x2, y2)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Point, Scalar};

    fn edge_canvas() -> Mat {
        Mat::new_rows_cols_with_default(240, 320, core::CV_8UC1, Scalar::all(0.0)).unwrap()
    }

    #[test]
    fn test_empty_map_yields_no_segments() {
        assert!(detect_segments(&edge_canvas()).unwrap().is_empty());
    }

    #[test]
    fn test_long_line_is_found() {
        let mut edges = edge_canvas();
        imgproc::line(
            &mut edges,
            Point::new(40, 200),
            Point::new(200, 40),
            Scalar::all(255.0),
            1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();

        let segments = detect_segments(&edges).unwrap();
        assert!(!segments.is_empty());
        for s in &segments {
            let dx = (s.x2 - s.x1) as f64;
            let dy = (s.y2 - s.y1) as f64;
            assert!((dx * dx + dy * dy).sqrt() >= MIN_LINE_LENGTH);
            // Anti-diagonal: y decreases as x grows
            assert!(dx * dy < 0.0);
        }
    }

    #[test]
    fn test_short_line_is_ignored() {
        let mut edges = edge_canvas();
        imgproc::line(
            &mut edges,
            Point::new(100, 100),
            Point::new(120, 100),
            Scalar::all(255.0),
            1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
        assert!(detect_segments(&edges).unwrap().is_empty());
    }
}
