//! Synthetic card scans.
//!
//! Renders an ideal card with holes placed exactly where the geometry model
//! predicts them. Used by the tests and benches, and by `cardscan render` to
//! produce reference images.

use crate::geometry::CardGeometry;
use crate::holes::{HoleGrid, ReadingOrder};
use crate::params::{ReaderParams, CARD_WIDTH_IN};
use cardscan_core::{CardImage, EdgeLine, ImageError};
use cardscan_hollerith::{encode_text, unpack_column, CodePage, COLUMNS, ROWS};
use serde::{Deserialize, Serialize};

/// Description of a synthetic scan. Defaults reproduce a straight card in
/// the standard 590 x 1181 px scanner window at 150 dpi.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntheticCard {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// Left card edge on row 0.
    pub left_edge: f64,
    pub card_width: f64,
    /// First background row below the card, at the card centre.
    pub front_y: f64,
    /// Horizontal shift of both side edges per row.
    pub skew: f64,
    pub card_level: u8,
    pub background_level: u8,
    pub dpi: f64,
    pub hole_half_x: i32,
    pub hole_half_y: i32,
    columns: Vec<u16>,
}

impl SyntheticCard {
    pub fn blank() -> Self {
        let holes = ReaderParams::default().holes;
        Self {
            width: 590,
            height: 1181,
            channels: 1,
            left_edge: 51.0,
            card_width: 488.0,
            front_y: 1141.0,
            skew: 0.0,
            card_level: 200,
            background_level: 0,
            dpi: 150.0,
            hole_half_x: holes.half_x,
            hole_half_y: holes.half_y,
            columns: vec![0; COLUMNS],
        }
    }

    /// Card punched with the given column patterns; `None` unless 80 are given.
    pub fn from_values(values: &[u16]) -> Option<Self> {
        (values.len() == COLUMNS).then(|| Self {
            columns: values.iter().map(|v| v & 0x0fff).collect(),
            ..Self::blank()
        })
    }

    /// Card punched with `text`, padded with blank columns.
    ///
    /// `None` when the text is longer than a card or has a character the
    /// code page cannot encode.
    pub fn from_text(text: &str, code_page: CodePage) -> Option<Self> {
        let mut values = encode_text(text, code_page)?;
        if values.len() > COLUMNS {
            return None;
        }
        values.resize(COLUMNS, 0);
        Self::from_values(&values)
    }

    /// Punch 1-based `(column, row)`; out-of-range cells are ignored.
    pub fn punch(&mut self, column: usize, row: usize) {
        if (1..=COLUMNS).contains(&column) && (1..=ROWS).contains(&row) {
            self.columns[column - 1] |= 1 << (ROWS - row);
        }
    }

    pub fn values(&self) -> &[u16] {
        &self.columns
    }

    pub fn grid(&self) -> HoleGrid {
        HoleGrid::from_columns(self.columns.iter().map(|&v| unpack_column(v)).collect())
            .unwrap_or_else(HoleGrid::blank)
    }

    /// Exact outline of the rendered card.
    pub fn geometry(&self) -> CardGeometry {
        CardGeometry {
            left: EdgeLine::new(self.left_edge, self.skew),
            right: EdgeLine::new(self.left_edge + self.card_width, self.skew),
            front_y: self.front_y,
            dpi: self.dpi,
        }
    }

    /// Mismatch between the rendered width and a nominal card.
    pub fn width_error(&self) -> f64 {
        self.card_width - CARD_WIDTH_IN * self.dpi
    }

    /// Scan of the front face.
    pub fn render_front(&self) -> Result<CardImage, ImageError> {
        let mut img =
            CardImage::filled(self.width, self.height, self.channels, self.background_level)?;
        let geometry = self.geometry();
        let cx = geometry.center_x(self.front_y) as f64;

        for y in 0..self.height as i32 {
            let yf = y as f64;
            let x0 = geometry.left.x_at(yf) as i32;
            let x1 = geometry.right.x_at(yf) as i32;
            for x in x0..x1 {
                // front edge is square to the side edges
                if yf < self.front_y - (x as f64 - cx) * self.skew {
                    img.set_pixel(x, y, self.card_level);
                }
            }
        }

        let (hx, hy) = (self.hole_half_x, self.hole_half_y);
        for column in 1..=COLUMNS {
            let holes = unpack_column(self.columns[column - 1]);
            for row in 1..=ROWS {
                if !holes[row - 1] {
                    continue;
                }
                let p = geometry.hole_position(column, row);
                let (x, y) = (p.x as i32, p.y as i32);
                img.fill_rect(x - hx, y - hy, x + hx + 1, y + hy + 1, self.background_level);
            }
        }
        Ok(img)
    }

    /// Scan of the back face: the front image mirrored left to right.
    pub fn render_back(&self) -> Result<CardImage, ImageError> {
        Ok(mirror_horizontally(&self.render_front()?))
    }

    /// Render the face read with `order`.
    pub fn render(&self, order: ReadingOrder) -> Result<CardImage, ImageError> {
        match order {
            ReadingOrder::Front => self.render_front(),
            ReadingOrder::Back => self.render_back(),
        }
    }
}

impl Default for SyntheticCard {
    fn default() -> Self {
        Self::blank()
    }
}

/// Flip an image left to right.
pub fn mirror_horizontally(src: &CardImage) -> CardImage {
    let c = src.channels;
    let mut data = Vec::with_capacity(src.data.len());
    for row in src.data.chunks_exact(src.width * c) {
        for px in row.chunks_exact(c).rev() {
            data.extend_from_slice(px);
        }
    }
    CardImage {
        width: src.width,
        height: src.height,
        channels: c,
        data,
    }
}
