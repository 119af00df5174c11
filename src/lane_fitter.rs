// src/lane_fitter.rs
//
// Turns a noisy set of Hough segments into at most one straight line per
// side of the ego lane.
//
//   1. Skip vertical segments (x1 == x2, slope undefined).
//   2. Least-squares line through each segment's two endpoints.
//   3. Bucket by slope sign. Image y grows downward, so the left boundary
//      leans with a negative slope and the right one with a non-negative
//      slope. This depends on a forward-facing camera and is kept as is.
//   4. Average slope and intercept independently per bucket.
//   5. Extrapolate each average from the bottom row up to 60% of the height.
//
// No outlier rejection and no history: every frame stands alone.

use crate::types::{LaneLine, LanePair, LineModel, Segment};
use opencv::core::Size;
use tracing::debug;

/// Upper extrapolation row as a fraction of the height (3/5).
const UPPER_ROW_NUM: i32 = 3;
const UPPER_ROW_DEN: i32 = 5;

/// Least-squares first-degree fit through `points`.
///
/// `None` with fewer than two points or when every x is equal.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineModel> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LineModel {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

fn mean_model(models: &[LineModel]) -> Option<LineModel> {
    if models.is_empty() {
        return None;
    }
    let n = models.len() as f64;
    Some(LineModel {
        slope: models.iter().map(|m| m.slope).sum::<f64>() / n,
        intercept: models.iter().map(|m| m.intercept).sum::<f64>() / n,
    })
}

/// Split segments into left (negative slope) and right (non-negative slope)
/// candidates and average each side. Sides without candidates are `None`.
pub fn average_slope_intercept(segments: &[Segment]) -> (Option<LineModel>, Option<LineModel>) {
    let mut left_fit = Vec::new();
    let mut right_fit = Vec::new();

    for segment in segments {
        if !segment.slope_defined() {
            continue;
        }
        let Some(model) = fit_line(&segment.endpoints()) else {
            continue;
        };
        if model.slope < 0.0 {
            left_fit.push(model);
        } else {
            right_fit.push(model);
        }
    }

    debug!(
        "Lane candidates: {} left, {} right ({} segments)",
        left_fit.len(),
        right_fit.len(),
        segments.len()
    );

    (mean_model(&left_fit), mean_model(&right_fit))
}

/// Extrapolate a model from row `height` up to row `3 * height / 5`.
///
/// A zero slope can't be solved for x and yields no line.
pub fn make_points(height: i32, model: Option<LineModel>) -> Option<LaneLine> {
    let model = model?;
    let y1 = height;
    let y2 = height * UPPER_ROW_NUM / UPPER_ROW_DEN;

    // Truncate toward zero; `as` saturates on non-finite input.
    let x1 = model.x_at(y1 as f64)? as i32;
    let x2 = model.x_at(y2 as f64)? as i32;

    Some(LaneLine { x1, y1, x2, y2 })
}

/// Fit and extrapolate both lane boundaries for a frame of `frame_size`.
pub fn fit_lanes(frame_size: Size, segments: &[Segment]) -> LanePair {
    let (left, right) = average_slope_intercept(segments);
    LanePair {
        left: make_points(frame_size.height, left),
        right: make_points(frame_size.height, right),
    }
}
