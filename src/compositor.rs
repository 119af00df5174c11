// src/compositor.rs

use crate::types::LanePair;
use anyhow::{ensure, Context, Result};
use opencv::{
    core::{self, Mat, Point, Scalar},
    imgproc,
    prelude::*,
};

/// Lane colour. Frames are BGR as decoded by OpenCV, so this is pure blue.
pub const LANE_COLOR: Scalar = Scalar::new(255.0, 0.0, 0.0, 0.0);
pub const LANE_THICKNESS: i32 = 10;

/// Blend weights: `frame * FRAME + overlay * OVERLAY + BIAS`, saturated.
pub mod weights {
    pub const FRAME: f64 = 0.8;
    pub const OVERLAY: f64 = 1.0;
    pub const BIAS: f64 = 1.0;
}

/// Draw the present lane lines on a black canvas shaped like `frame`.
pub fn display_lines(frame: &Mat, lanes: &LanePair) -> Result<Mat> {
    let mut canvas = Mat::new_size_with_default(frame.size()?, frame.typ(), Scalar::all(0.0))?;

    for lane in lanes.iter() {
        imgproc::line(
            &mut canvas,
            Point::new(lane.x1, lane.y1),
            Point::new(lane.x2, lane.y2),
            LANE_COLOR,
            LANE_THICKNESS,
            imgproc::LINE_8,
            0,
        )
        .context("failed to draw lane line")?;
    }

    Ok(canvas)
}

/// Alpha-blend the line layer onto a copy of the frame.
pub fn blend(frame: &Mat, overlay: &Mat) -> Result<Mat> {
    ensure!(
        frame.size()? == overlay.size()? && frame.typ() == overlay.typ(),
        "overlay {:?} (type {}) does not match frame {:?} (type {})",
        overlay.size()?,
        overlay.typ(),
        frame.size()?,
        frame.typ()
    );

    let mut combo = Mat::default();
    core::add_weighted(
        frame,
        weights::FRAME,
        overlay,
        weights::OVERLAY,
        weights::BIAS,
        &mut combo,
        -1,
    )?;
    Ok(combo)
}

/// Render `lanes` over `frame`, returning a new image.
pub fn composite(frame: &Mat, lanes: &LanePair) -> Result<Mat> {
    let overlay = display_lines(frame, lanes)?;
    blend(frame, &overlay)
}
