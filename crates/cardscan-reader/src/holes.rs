//! Hole detection with adaptive drift correction.
//!
//! Cells are visited in reading order: column 1..80, and within a column
//! row 1..12 of the geometry model. Each cell searches a few pixels around
//! its predicted centre for the darkest box. Confirmed holes pull the
//! prediction for every later cell a little towards where they were found.

use crate::geometry::CardGeometry;
use crate::params::HoleScanParams;
use cardscan_core::{DebugOverlay, IntegralImage};
use cardscan_hollerith::{pack_column, unpack_column, COLUMNS, ROWS};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Which face of the card the image shows.
///
/// A back-face scan sees the rows mirrored, so geometry row `k` is physical
/// row `13 - k`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingOrder {
    #[default]
    Front,
    Back,
}

impl ReadingOrder {
    /// Physical row (1-based) for a 1-based geometry row.
    #[inline]
    pub fn physical_row(self, geometry_row: usize) -> usize {
        match self {
            ReadingOrder::Front => geometry_row,
            ReadingOrder::Back => ROWS + 1 - geometry_row,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadingOrder::Front => "front",
            ReadingOrder::Back => "back",
        }
    }
}

/// 80 x 12 punch pattern in physical order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleGrid {
    columns: Vec<[bool; ROWS]>,
}

impl HoleGrid {
    pub fn blank() -> Self {
        Self {
            columns: vec![[false; ROWS]; COLUMNS],
        }
    }

    /// `None` unless exactly 80 columns are given.
    pub fn from_columns(columns: Vec<[bool; ROWS]>) -> Option<Self> {
        (columns.len() == COLUMNS).then_some(Self { columns })
    }

    /// Grid from 12-bit column patterns; `None` unless exactly 80 are given.
    pub fn from_values(values: &[u16]) -> Option<Self> {
        Self::from_columns(values.iter().map(|&v| unpack_column(v)).collect())
    }

    /// Whether 1-based `(column, row)` is punched; `false` outside the card.
    pub fn is_punched(&self, column: usize, row: usize) -> bool {
        if row == 0 || row > ROWS || column == 0 {
            return false;
        }
        self.columns
            .get(column - 1)
            .is_some_and(|holes| holes[row - 1])
    }

    pub fn columns(&self) -> &[[bool; ROWS]] {
        &self.columns
    }

    /// One 12-bit pattern per column, row 1 as the most significant bit.
    pub fn column_values(&self) -> Vec<u16> {
        self.columns.iter().map(pack_column).collect()
    }

    pub fn punched(&self) -> usize {
        self.columns.iter().flatten().filter(|&&h| h).count()
    }

    /// Twelve 80-character lines, `#` for a hole and `-` otherwise.
    pub fn rows_ascii(&self) -> Vec<String> {
        (0..ROWS)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|holes| if holes[row] { '#' } else { '-' })
                    .collect()
            })
            .collect()
    }
}

/// Running correction added to every predicted hole centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub offset: Vector2<f64>,
}

impl Drift {
    /// Move towards a found hole's search offset, then clamp the magnitude.
    pub fn nudge(&mut self, found: Vector2<i32>, rate: f64, max: Option<f64>) {
        self.offset += found.cast::<f64>() * rate;
        if let Some(max) = max {
            let norm = self.offset.norm();
            if norm > max {
                self.offset *= max / norm;
            }
        }
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.offset.norm()
    }
}

/// Outcome of probing one predicted hole centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Search offset with the darkest box.
    pub offset: Vector2<i32>,
    /// Summed intensity of that box.
    pub weight: u64,
    pub punched: bool,
}

/// Result of scanning all 960 cells of one card.
#[derive(Clone, Debug, PartialEq)]
pub struct HoleScan {
    pub grid: HoleGrid,
    pub drift: Drift,
    /// Number of holes found.
    pub punched: usize,
    /// Largest drift magnitude seen during the scan.
    pub peak_drift: f64,
}

/// Classifies cells of one image.
pub struct HoleScanner<'a> {
    integral: &'a IntegralImage,
    params: &'a HoleScanParams,
    threshold: u64,
}

impl<'a> HoleScanner<'a> {
    pub fn new(integral: &'a IntegralImage, params: &'a HoleScanParams) -> Self {
        let threshold = params.box_threshold(integral.channels());
        Self {
            integral,
            params,
            threshold,
        }
    }

    /// Summed-intensity threshold; boxes strictly below it are holes.
    #[inline]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Search around `(x, y)` for the darkest hole box.
    ///
    /// Offsets are tried column by column (`dx` outer, `dy` inner); the first
    /// minimum wins ties.
    pub fn probe(&self, x: i32, y: i32) -> Probe {
        let p = self.params;
        let mut best = Probe {
            offset: Vector2::zeros(),
            weight: u64::MAX,
            punched: false,
        };
        for dx in -p.search_x..=p.search_x {
            for dy in -p.search_y..=p.search_y {
                let weight = self.integral.box_sum(
                    x.saturating_add(dx),
                    y.saturating_add(dy),
                    p.half_x,
                    p.half_y,
                );
                if weight < best.weight {
                    best.weight = weight;
                    best.offset = Vector2::new(dx, dy);
                }
            }
        }
        best.punched = best.weight < self.threshold;
        best
    }

    /// Classify every cell of the card.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, geometry, overlay))
    )]
    pub fn scan(
        &self,
        geometry: &CardGeometry,
        order: ReadingOrder,
        mut overlay: Option<&mut DebugOverlay>,
    ) -> HoleScan {
        let p = self.params;
        let mut drift = Drift::default();
        let mut peak_drift = 0.0f64;
        let mut columns = Vec::with_capacity(COLUMNS);

        for column in 1..=COLUMNS {
            let mut holes = [false; ROWS];
            for row in 1..=ROWS {
                let ideal = geometry.hole_position(column, row) + drift.offset;
                let x = ideal.x as i32;
                let y = ideal.y as i32;
                let probe = self.probe(x, y);
                holes[order.physical_row(row) - 1] = probe.punched;

                if probe.punched {
                    drift.nudge(probe.offset, p.fine_tune, p.max_drift);
                    peak_drift = peak_drift.max(drift.magnitude());
                    if let Some(overlay) = overlay.as_deref_mut() {
                        let c = Vector2::new(x, y) + probe.offset;
                        overlay.outline(c.x, c.y, p.half_x, p.half_y, u8::MAX);
                    }
                } else if let Some(overlay) = overlay.as_deref_mut() {
                    overlay.dim_box(x, y, p.half_x, p.half_y);
                }
            }
            columns.push(holes);
        }

        let grid = HoleGrid { columns };
        let punched = grid.punched();
        log::debug!(
            "{} holes on {} face, final drift ({:.3}, {:.3})",
            punched,
            order.label(),
            drift.offset.x,
            drift.offset.y
        );

        HoleScan {
            grid,
            drift,
            punched,
            peak_drift,
        }
    }
}
