// src/edges.rs

use anyhow::{ensure, Context, Result};
use opencv::{
    core::{self, Mat, Size},
    imgproc,
    prelude::*,
};

const BLUR_KERNEL: i32 = 5;
const CANNY_LOW: f64 = 50.0;
const CANNY_HIGH: f64 = 150.0;
const CANNY_APERTURE: i32 = 3;

/// Reject anything the pipeline cannot consume: empty, non-8-bit, or
/// neither gray nor BGR.
pub fn check_frame(frame: &Mat) -> Result<()> {
    ensure!(!frame.empty(), "empty frame");
    ensure!(
        frame.depth() == core::CV_8U,
        "expected an 8-bit frame, got depth {}",
        frame.depth()
    );
    ensure!(
        matches!(frame.channels(), 1 | 3),
        "expected 1 or 3 channels, got {}",
        frame.channels()
    );
    Ok(())
}

/// Grayscale, 5x5 Gaussian blur, then Canny with 50/150 hysteresis.
///
/// Returns a single-channel edge map (0 or 255) of the frame's size.
pub fn extract_edges(frame: &Mat) -> Result<Mat> {
    check_frame(frame)?;

    let gray = if frame.channels() == 3 {
        let mut gray = Mat::default();
        imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)
            .context("grayscale conversion failed")?;
        gray
    } else {
        frame.try_clone()?
    };

    let mut blurred = Mat::default();
    imgproc::gaussian_blur_def(
        &gray,
        &mut blurred,
        Size::new(BLUR_KERNEL, BLUR_KERNEL),
        0.0,
    )
    .context("gaussian blur failed")?;

    let mut edges = Mat::default();
    imgproc::canny(
        &blurred,
        &mut edges,
        CANNY_LOW,
        CANNY_HIGH,
        CANNY_APERTURE,
        false,
    )
    .context("canny failed")?;

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Point, Rect, Scalar};

    fn blank(width: i32, height: i32, typ: i32, value: f64) -> Mat {
        Mat::new_rows_cols_with_default(height, width, typ, Scalar::all(value)).unwrap()
    }

    #[test]
    fn test_uniform_frame_has_no_edges() {
        let frame = blank(320, 240, core::CV_8UC3, 90.0);
        let edges = extract_edges(&frame).unwrap();
        assert_eq!(edges.size().unwrap(), frame.size().unwrap());
        assert_eq!(edges.channels(), 1);
        assert_eq!(core::count_non_zero(&edges).unwrap(), 0);
    }

    #[test]
    fn test_step_edge_is_detected() {
        let mut frame = blank(320, 240, core::CV_8UC3, 0.0);
        imgproc::rectangle(
            &mut frame,
            Rect::new(160, 0, 160, 240),
            Scalar::all(255.0),
            -1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();

        let edges = extract_edges(&frame).unwrap();
        assert!(core::count_non_zero(&edges).unwrap() > 200);
        // Nothing far from the boundary
        assert_eq!(*edges.at_2d::<u8>(120, 40).unwrap(), 0);
        assert_eq!(*edges.at_2d::<u8>(120, 280).unwrap(), 0);
    }

    #[test]
    fn test_gray_frame_is_accepted() {
        let mut frame = blank(200, 100, core::CV_8UC1, 20.0);
        imgproc::line(
            &mut frame,
            Point::new(0, 50),
            Point::new(199, 50),
            Scalar::all(230.0),
            5,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
        let edges = extract_edges(&frame).unwrap();
        assert!(core::count_non_zero(&edges).unwrap() > 0);
    }

    #[test]
    fn test_rejects_unsupported_frames() {
        assert!(extract_edges(&Mat::default()).is_err());
        assert!(extract_edges(&blank(64, 64, core::CV_32FC3, 0.0)).is_err());
        assert!(extract_edges(&blank(64, 64, core::CV_8UC4, 0.0)).is_err());
    }
}
