//! Reader configuration.
//!
//! Defaults match a 150 dpi duplex scan, fed tail-first, of a card centred in
//! a 100 x 200 mm window (590 x 1181 px).

use cardscan_core::Polarity;
use serde::{Deserialize, Serialize};

/// Card width across the rows (FIPS-13), inches.
pub const CARD_WIDTH_IN: f64 = 13.0 * ROW_PITCH_IN;
/// Distance between hole rows, inches.
pub const ROW_PITCH_IN: f64 = 0.25;
/// Distance between hole columns, inches.
pub const COLUMN_PITCH_IN: f64 = 0.087;
/// Distance from the front edge to the centre of column 1, inches.
pub const FIRST_COLUMN_IN: f64 = 0.25;

/// Upper bound for every pixel-valued parameter.
pub const MAX_PARAM_PX: i32 = 1 << 16;
/// Upper bound for the scan resolution.
pub const MAX_DPI: f64 = 9600.0;

/// Left/right edge search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSearchParams {
    /// Half-width of the contrast window, and of the search span around the
    /// current estimate.
    pub half_window: i32,
    /// Expected left edge, pixels from the left image border.
    pub expect_left: i32,
    /// Expected right edge, pixels from the right image border.
    pub expect_right: i32,
    /// First sampled row.
    pub first_row: i32,
    /// Distance between sampled rows.
    pub row_step: i32,
    /// Rows at the bottom of the image that are never sampled.
    pub bottom_margin: i32,
    /// Weight of a new measurement in the running search centre.
    pub smoothing: f64,
}

impl Default for EdgeSearchParams {
    fn default() -> Self {
        Self {
            half_window: 10,
            expect_left: 50,
            expect_right: 50,
            first_row: 100,
            row_step: 100,
            bottom_margin: 200,
            smoothing: 0.125,
        }
    }
}

/// Front edge search near the bottom of the image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontEdgeParams {
    pub half_window: i32,
    /// Rows at the very bottom that are skipped.
    pub skip_rows: i32,
    /// The search stops this many rows above the bottom.
    pub span_rows: i32,
}

impl Default for FrontEdgeParams {
    fn default() -> Self {
        Self {
            half_window: 10,
            skip_rows: 20,
            span_rows: 200,
        }
    }
}

/// Hole classification and drift tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleScanParams {
    /// Hole box is `(2 * half_x + 1) x (2 * half_y + 1)` pixels.
    pub half_x: i32,
    pub half_y: i32,
    /// Search radius around the predicted centre.
    pub search_x: i32,
    pub search_y: i32,
    /// Mean per-channel intensity below which a box counts as a hole.
    ///
    /// Error rates on our scans are minimal between 35 and 67.
    pub threshold: u32,
    /// Fraction of each found hole's offset fed back into the drift.
    pub fine_tune: f64,
    /// Optional bound on the drift magnitude, pixels.
    pub max_drift: Option<f64>,
}

impl Default for HoleScanParams {
    fn default() -> Self {
        Self {
            half_x: 6,
            half_y: 3,
            search_x: 1,
            search_y: 2,
            threshold: 50,
            fine_tune: 0.05,
            max_drift: None,
        }
    }
}

impl HoleScanParams {
    /// Summed-intensity threshold for an image with `channels` channels.
    pub fn box_threshold(&self, channels: usize) -> u64 {
        let side = |half: i32| (2 * i64::from(half) + 1).unsigned_abs();
        side(self.half_x)
            .saturating_mul(side(self.half_y))
            .saturating_mul(u64::from(self.threshold))
            .saturating_mul(channels as u64)
    }
}

/// Full reader configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderParams {
    /// Scan resolution, dots per inch.
    pub dpi: f64,
    pub polarity: Polarity,
    pub edges: EdgeSearchParams,
    pub front_edge: FrontEdgeParams,
    pub holes: HoleScanParams,
}

impl Default for ReaderParams {
    fn default() -> Self {
        Self {
            dpi: 150.0,
            polarity: Polarity::DarkHoles,
            edges: EdgeSearchParams::default(),
            front_edge: FrontEdgeParams::default(),
            holes: HoleScanParams::default(),
        }
    }
}

impl ReaderParams {
    /// Nominal card width in pixels.
    #[inline]
    pub fn card_width_px(&self) -> f64 {
        CARD_WIDTH_IN * self.dpi
    }

    /// Reason the parameters cannot drive a read, if any.
    ///
    /// Pixel-valued fields must lie in `0..=MAX_PARAM_PX` (windows and the
    /// row step at least 1), so no stage can overflow or loop without end.
    pub fn validate(&self) -> Result<(), &'static str> {
        let px = |v: i32| (0..=MAX_PARAM_PX).contains(&v);
        let positive_px = |v: i32| (1..=MAX_PARAM_PX).contains(&v);

        if !self.dpi.is_finite() || self.dpi <= 0.0 || self.dpi > MAX_DPI {
            return Err("dpi must be positive and at most 9600");
        }
        let e = &self.edges;
        if !positive_px(e.half_window) || !positive_px(self.front_edge.half_window) {
            return Err("edge windows must be between 1 and 65536 px");
        }
        if !positive_px(e.row_step) {
            return Err("edge row step must be between 1 and 65536 px");
        }
        if !px(e.expect_left) || !px(e.expect_right) || !px(e.first_row) || !px(e.bottom_margin)
        {
            return Err("edge search offsets must be between 0 and 65536 px");
        }
        if !(0.0..=1.0).contains(&e.smoothing) {
            return Err("edge smoothing must be within [0, 1]");
        }
        if !px(self.front_edge.skip_rows) || !px(self.front_edge.span_rows) {
            return Err("front edge rows must be between 0 and 65536 px");
        }
        let h = &self.holes;
        if !px(h.half_x) || !px(h.half_y) {
            return Err("hole box extents must be between 0 and 65536 px");
        }
        if !px(h.search_x) || !px(h.search_y) {
            return Err("hole search radii must be between 0 and 65536 px");
        }
        if !(0.0..=1.0).contains(&h.fine_tune) {
            return Err("fine-tune rate must be within [0, 1]");
        }
        if matches!(h.max_drift, Some(m) if m.is_nan() || m < 0.0) {
            return Err("drift bound must not be negative");
        }
        Ok(())
    }
}
