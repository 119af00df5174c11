use crate::region::roi_vertices;
use crate::types::Segment;
use anyhow::Result;
use opencv::{
    core::{self, Mat, Point, Vector},
    imgproc,
    prelude::*,
};

const SEGMENT_COLOR: core::Scalar = core::Scalar::new(0.0, 255.0, 0.0, 0.0); // Green
const ROI_COLOR: core::Scalar = core::Scalar::new(0.0, 255.0, 255.0, 0.0); // Yellow

/// Draw the raw Hough segments and the ROI outline over an annotated frame.
pub fn visualize_segments(frame: &Mat, segments: &[Segment]) -> Result<Mat> {
    let mut debug_frame = frame.try_clone()?;

    let mut outline = Vector::<Vector<Point>>::new();
    outline.push(Vector::from_iter(roi_vertices(frame.cols(), frame.rows())));
    imgproc::polylines(
        &mut debug_frame,
        &outline,
        true,
        ROI_COLOR,
        1,
        imgproc::LINE_8,
        0,
    )?;

    for s in segments {
        imgproc::line(
            &mut debug_frame,
            Point::new(s.x1, s.y1),
            Point::new(s.x2, s.y2),
            SEGMENT_COLOR,
            2,
            imgproc::LINE_8,
            0,
        )?;
    }

    imgproc::put_text(
        &mut debug_frame,
        &format!("Segments: {}", segments.len()),
        Point::new(10, 30),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.8,
        SEGMENT_COLOR,
        2,
        imgproc::LINE_8,
        false,
    )?;

    Ok(debug_frame)
}
