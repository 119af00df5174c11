// src/region.rs
//
// Trapezoidal region of interest covering the road directly ahead.
// Vertices are fractions of the frame size so any resolution works:
//
//        (0.4W, 0.6H) ┌────┐ (0.6W, 0.6H)
//                    ╱      ╲
//                   ╱        ╲
//      (0.1W, H)   └──────────┘   (0.9W, H)

use anyhow::{ensure, Context, Result};
use opencv::{
    core::{self, Mat, Point, Scalar, Vector},
    imgproc,
    prelude::*,
};

const BOTTOM_LEFT_X: f64 = 0.1;
const TOP_LEFT_X: f64 = 0.4;
const TOP_RIGHT_X: f64 = 0.6;
const BOTTOM_RIGHT_X: f64 = 0.9;
const TOP_Y: f64 = 0.6;

/// ROI polygon for a frame of the given size, coordinates truncated to pixels.
pub fn roi_vertices(width: i32, height: i32) -> [Point; 4] {
    let w = width as f64;
    let h = height as f64;
    let top = (h * TOP_Y) as i32;
    [
        Point::new((w * BOTTOM_LEFT_X) as i32, height),
        Point::new((w * TOP_LEFT_X) as i32, top),
        Point::new((w * TOP_RIGHT_X) as i32, top),
        Point::new((w * BOTTOM_RIGHT_X) as i32, height),
    ]
}

/// Zero every edge pixel outside the ROI; pixels inside pass through.
pub fn region_of_interest(edges: &Mat) -> Result<Mat> {
    ensure!(!edges.empty(), "empty edge map");
    ensure!(
        edges.typ() == core::CV_8UC1,
        "edge map must be single-channel 8-bit, got type {}",
        edges.typ()
    );

    let mut mask = Mat::new_size_with_default(edges.size()?, core::CV_8UC1, Scalar::all(0.0))?;
    let mut polygon = Vector::<Vector<Point>>::new();
    polygon.push(Vector::from_iter(roi_vertices(edges.cols(), edges.rows())));
    imgproc::fill_poly(
        &mut mask,
        &polygon,
        Scalar::all(255.0),
        imgproc::LINE_8,
        0,
        Point::new(0, 0),
    )
    .context("failed to rasterise ROI")?;

    let mut masked = Mat::default();
    core::bitwise_and(edges, &mask, &mut masked, &core::no_array())?;
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_scale_with_frame() {
        let v = roi_vertices(640, 480);
        assert_eq!(v[0], Point::new(64, 480));
        assert_eq!(v[1], Point::new(256, 288));
        assert_eq!(v[2], Point::new(384, 288));
        assert_eq!(v[3], Point::new(576, 480));

        // Truncated, not rounded
        let v = roi_vertices(1279, 719);
        assert_eq!(v[0], Point::new(127, 719));
        assert_eq!(v[1], Point::new(511, 431));
        assert_eq!(v[3], Point::new(1151, 719));
    }

    #[test]
    fn test_mask_keeps_only_trapezoid() {
        let edges =
            Mat::new_rows_cols_with_default(480, 640, core::CV_8UC1, Scalar::all(255.0)).unwrap();
        let masked = region_of_interest(&edges).unwrap();

        assert_eq!(masked.size().unwrap(), edges.size().unwrap());
        // Inside: bottom centre and just under the top edge
        assert_eq!(*masked.at_2d::<u8>(470, 320).unwrap(), 255);
        assert_eq!(*masked.at_2d::<u8>(300, 320).unwrap(), 255);
        // Outside: sky, bottom corners, above the top edge
        assert_eq!(*masked.at_2d::<u8>(50, 320).unwrap(), 0);
        assert_eq!(*masked.at_2d::<u8>(479, 10).unwrap(), 0);
        assert_eq!(*masked.at_2d::<u8>(479, 630).unwrap(), 0);
        assert_eq!(*masked.at_2d::<u8>(280, 320).unwrap(), 0);
        // Beside the top edge but outside the slanted sides
        assert_eq!(*masked.at_2d::<u8>(300, 200).unwrap(), 0);
        assert_eq!(*masked.at_2d::<u8>(300, 440).unwrap(), 0);
    }

    #[test]
    fn test_input_is_untouched() {
        let edges =
            Mat::new_rows_cols_with_default(100, 100, core::CV_8UC1, Scalar::all(255.0)).unwrap();
        let _ = region_of_interest(&edges).unwrap();
        assert_eq!(core::count_non_zero(&edges).unwrap(), 100 * 100);
    }

    #[test]
    fn test_rejects_color_input() {
        let color =
            Mat::new_rows_cols_with_default(10, 10, core::CV_8UC3, Scalar::all(0.0)).unwrap();
        assert!(region_of_interest(&color).is_err());
    }
}
