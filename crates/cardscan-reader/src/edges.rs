//! Left/right card edge estimation.
//!
//! The card edges are sampled on a sparse set of rows. On each row a short
//! contrast window slides around the running estimate; the best position
//! feeds a low-pass filtered search centre for the next row. Each edge is
//! then fitted with a least-squares line `x = a + b * y`.

use crate::geometry::center_between;
use crate::params::ReaderParams;
use cardscan_core::{fit_line, DebugOverlay, EdgeLine, IntegralImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Which side of the card an edge bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// One sampled row; `None` where no window showed any contrast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSample {
    pub y: i32,
    pub left: Option<i32>,
    pub right: Option<i32>,
}

/// How well the edge samples supported the fitted lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeQuality {
    pub sampled_rows: usize,
    /// Rows where the left edge kept its previous estimate.
    pub left_degraded_rows: usize,
    /// Rows where the right edge kept its previous estimate.
    pub right_degraded_rows: usize,
    /// The lines are the expected positions, not a fit.
    pub fallback: bool,
}

impl EdgeQuality {
    pub fn is_clean(&self) -> bool {
        !self.fallback && self.left_degraded_rows == 0 && self.right_degraded_rows == 0
    }
}

/// Fitted left and right card edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeModel {
    pub left: EdgeLine,
    pub right: EdgeLine,
    pub samples: Vec<EdgeSample>,
    pub quality: EdgeQuality,
}

impl EdgeModel {
    /// Model from known lines, without sampling information.
    pub fn from_lines(left: EdgeLine, right: EdgeLine) -> Self {
        Self {
            left,
            right,
            samples: Vec::new(),
            quality: EdgeQuality::default(),
        }
    }

    /// Horizontal card centre on row `y`, in whole pixels.
    #[inline]
    pub fn center_x(&self, y: f64) -> i32 {
        center_between(&self.left, &self.right, y)
    }

    /// Distance between the two edges on row `y`.
    #[inline]
    pub fn width_at(&self, y: f64) -> f64 {
        self.right.x_at(y) - self.left.x_at(y)
    }
}

/// Best edge position in `[center - w, center + w)` on row `y`.
///
/// The contrast is the card-side window minus the background-side window;
/// only strictly positive contrast counts.
fn search_edge(integral: &IntegralImage, y: i32, center: i32, w: i32, side: Side) -> Option<i32> {
    let mut best: Option<(i32, i64)> = None;
    for x in center.saturating_sub(w)..center.saturating_add(w) {
        let after = integral.row_sum(y, x, x.saturating_add(w)) as i64;
        let before = integral.row_sum(y, x.saturating_sub(w), x) as i64;
        let contrast = match side {
            Side::Left => after - before,
            Side::Right => before - after,
        };
        if contrast > best.map_or(0, |(_, c)| c) {
            best = Some((x, contrast));
        }
    }
    best.map(|(x, _)| x)
}

#[inline]
fn smooth(center: i32, found: i32, rate: f64) -> i32 {
    (center as f64 + (found - center) as f64 * rate) as i32
}

/// Estimate both card edges.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(integral, params, overlay),
        fields(width = integral.width(), height = integral.height())
    )
)]
pub fn estimate_edges(
    integral: &IntegralImage,
    params: &ReaderParams,
    overlay: Option<&mut DebugOverlay>,
) -> EdgeModel {
    let p = &params.edges;
    let height = integral.height() as i32;
    let left_start = p.expect_left;
    let right_start = integral.width() as i32 - p.expect_right;

    let mut center_left = left_start;
    let mut center_right = right_start;
    let mut quality = EdgeQuality::default();
    let mut samples = Vec::new();
    let mut ys = Vec::new();
    let mut lefts = Vec::new();
    let mut rights = Vec::new();

    let mut y = p.first_row;
    while y < height - p.bottom_margin {
        let left = search_edge(integral, y, center_left, p.half_window, Side::Left);
        let right = search_edge(integral, y, center_right, p.half_window, Side::Right);

        let xl = left.unwrap_or_else(|| {
            quality.left_degraded_rows += 1;
            center_left
        });
        let xr = right.unwrap_or_else(|| {
            quality.right_degraded_rows += 1;
            center_right
        });

        samples.push(EdgeSample { y, left, right });
        ys.push(y as f64);
        lefts.push(xl as f64);
        rights.push(xr as f64);

        center_left = smooth(center_left, xl, p.smoothing);
        center_right = smooth(center_right, xr, p.smoothing);
        y = y.saturating_add(p.row_step);
    }
    quality.sampled_rows = samples.len();

    let (left, right) = match (fit_line(&ys, &lefts), fit_line(&ys, &rights)) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            quality.fallback = true;
            (
                EdgeLine::vertical(left_start as f64),
                EdgeLine::vertical(right_start as f64),
            )
        }
    };

    let model = EdgeModel {
        left,
        right,
        samples,
        quality,
    };

    log::debug!(
        "edges: left x={:.2}{:+.5}*y right x={:.2}{:+.5}*y over {} rows",
        left.intercept,
        left.slope,
        right.intercept,
        right.slope,
        quality.sampled_rows
    );
    if !quality.is_clean() {
        log::warn!(
            "edge estimate degraded: {} left / {} right rows without contrast (of {}), fallback={}",
            quality.left_degraded_rows,
            quality.right_degraded_rows,
            quality.sampled_rows,
            quality.fallback
        );
    }

    if let Some(overlay) = overlay {
        let half = 0.5 * params.card_width_px();
        for y in p.first_row..height - p.bottom_margin {
            let cx = model.center_x(y as f64) as f64;
            overlay.stipple((cx - half) as i32, y, y);
            overlay.stipple((cx + half) as i32, y, y);
        }
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::{CardImage, Polarity};

    fn card_image(width: usize, height: usize, left: i32, right: i32) -> CardImage {
        let mut img = CardImage::filled(width, height, 1, 0).expect("image");
        img.fill_rect(left, 0, right, height as i32, 200);
        img
    }

    #[test]
    fn finds_straight_edges() {
        let img = card_image(590, 1181, 51, 539);
        let integral = IntegralImage::new(&img.view(), Polarity::DarkHoles);
        let model = estimate_edges(&integral, &ReaderParams::default(), None);

        assert_eq!(model.left, EdgeLine::vertical(51.0));
        assert_eq!(model.right, EdgeLine::vertical(539.0));
        assert_eq!(model.quality.sampled_rows, 9);
        assert!(model.quality.is_clean());
        assert_eq!(model.center_x(500.0), 295);
        assert_eq!(model.width_at(0.0), 488.0);
    }

    #[test]
    fn follows_a_slanted_edge() {
        let mut img = CardImage::filled(590, 1181, 1, 0).expect("image");
        for y in 0..1181 {
            let shift = y / 100;
            img.fill_rect(48 + shift, y, 536 + shift, y + 1, 180);
        }
        let integral = IntegralImage::new(&img.view(), Polarity::DarkHoles);
        let model = estimate_edges(&integral, &ReaderParams::default(), None);

        assert!((model.left.slope - 0.01).abs() < 1e-9);
        assert!((model.right.slope - 0.01).abs() < 1e-9);
        assert!((model.left.x_at(500.0) - 53.0).abs() < 1e-6);
        assert!((model.right.x_at(500.0) - 541.0).abs() < 1e-6);
    }

    #[test]
    fn blank_rows_keep_the_previous_estimate() {
        let img = CardImage::filled(590, 1181, 1, 0).expect("image");
        let integral = IntegralImage::new(&img.view(), Polarity::DarkHoles);
        let model = estimate_edges(&integral, &ReaderParams::default(), None);

        assert_eq!(model.quality.left_degraded_rows, 9);
        assert_eq!(model.quality.right_degraded_rows, 9);
        assert!(!model.quality.fallback);
        assert!(model.samples.iter().all(|s| s.left.is_none() && s.right.is_none()));
        assert_eq!(model.left, EdgeLine::vertical(50.0));
        assert_eq!(model.right, EdgeLine::vertical(540.0));
    }

    #[test]
    fn tiny_images_fall_back_to_expected_edges() {
        let img = card_image(120, 250, 40, 80);
        let integral = IntegralImage::new(&img.view(), Polarity::DarkHoles);
        let model = estimate_edges(&integral, &ReaderParams::default(), None);

        assert!(model.quality.fallback);
        assert_eq!(model.left, EdgeLine::vertical(50.0));
        assert_eq!(model.right, EdgeLine::vertical(70.0));
    }

    #[test]
    fn overlay_draws_both_edges() {
        let img = card_image(590, 1181, 51, 539);
        let integral = IntegralImage::new(&img.view(), Polarity::DarkHoles);
        let mut overlay = DebugOverlay::for_view(&img.view());
        estimate_edges(&integral, &ReaderParams::default(), Some(&mut overlay));
        assert_eq!(overlay.marked(), 2 * (981 - 100));
    }
}
