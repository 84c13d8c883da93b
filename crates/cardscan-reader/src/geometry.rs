//! Ideal hole positions from the calibrated card outline.

use crate::edges::EdgeModel;
use crate::front_edge::FrontEdge;
use crate::params::{CARD_WIDTH_IN, COLUMN_PITCH_IN, FIRST_COLUMN_IN, ROW_PITCH_IN};
use cardscan_core::EdgeLine;
use cardscan_hollerith::{COLUMNS, ROWS};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Whole-pixel midpoint of two edge lines on row `y`.
#[inline]
pub(crate) fn center_between(left: &EdgeLine, right: &EdgeLine, y: f64) -> i32 {
    let xl = left.x_at(y) as i32;
    let xr = right.x_at(y) as i32;
    ((xl + xr) as f64 * 0.5) as i32
}

/// Calibrated card outline: both side edges and the front edge row.
///
/// Columns run up the image from the front edge; rows run across it, with
/// the card skew taken from the right edge's slope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardGeometry {
    pub left: EdgeLine,
    pub right: EdgeLine,
    pub front_y: f64,
    pub dpi: f64,
}

impl CardGeometry {
    pub fn new(edges: &EdgeModel, front: &FrontEdge, dpi: f64) -> Self {
        Self {
            left: edges.left,
            right: edges.right,
            front_y: front.y as f64,
            dpi,
        }
    }

    /// Horizontal card centre on row `y`, in whole pixels.
    #[inline]
    pub fn center_x(&self, y: f64) -> i32 {
        center_between(&self.left, &self.right, y)
    }

    /// Ideal centre of the hole at 1-based `column` (1..=80) and `row` (1..=12).
    pub fn hole_position(&self, column: usize, row: usize) -> Point2<f64> {
        debug_assert!((1..=COLUMNS).contains(&column), "column {column} out of range");
        debug_assert!((1..=ROWS).contains(&row), "row {row} out of range");

        let row_offset = row as f64 - (ROWS as f64 + 1.0) * 0.5;
        let across = row_offset * ROW_PITCH_IN * self.dpi;
        let along = (FIRST_COLUMN_IN + COLUMN_PITCH_IN * (column - 1) as f64) * self.dpi;

        let y = self.front_y - along - across * self.right.slope;
        let x = self.center_x(y) as f64 + across;
        Point2::new(x, y)
    }

    pub fn card_width_at(&self, y: f64) -> f64 {
        self.right.x_at(y) - self.left.x_at(y)
    }

    pub fn nominal_width(&self) -> f64 {
        CARD_WIDTH_IN * self.dpi
    }

    /// Measured minus nominal card width, at the middle of the punched area.
    pub fn width_deviation(&self) -> f64 {
        let first = self.hole_position(1, 1).y;
        let last = self.hole_position(COLUMNS, 1).y;
        self.card_width_at(0.5 * (first + last)) - self.nominal_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight() -> CardGeometry {
        CardGeometry {
            left: EdgeLine::vertical(51.0),
            right: EdgeLine::vertical(539.0),
            front_y: 1141.0,
            dpi: 150.0,
        }
    }

    #[test]
    fn first_and_last_holes_of_a_straight_card() {
        let g = straight();
        let p = g.hole_position(1, 1);
        assert_relative_eq!(p.x, 295.0 - 206.25);
        assert_relative_eq!(p.y, 1141.0 - 37.5);

        let p = g.hole_position(1, 12);
        assert_relative_eq!(p.x, 295.0 + 206.25);

        let p = g.hole_position(80, 6);
        assert_relative_eq!(p.x, 295.0 - 18.75);
        assert_relative_eq!(p.y, 1141.0 - 37.5 - 79.0 * 13.05, epsilon = 1e-9);
    }

    #[test]
    fn rows_are_symmetric_about_the_centre() {
        let g = straight();
        for row in 1..=6 {
            let a = g.hole_position(10, row);
            let b = g.hole_position(10, ROWS + 1 - row);
            assert_relative_eq!(a.x + b.x, 2.0 * 295.0);
            assert_relative_eq!(a.y, b.y);
        }
    }

    #[test]
    fn skew_tilts_rows_against_the_right_edge_slope() {
        let g = CardGeometry {
            left: EdgeLine::new(40.0, 0.01),
            right: EdgeLine::new(528.0, 0.01),
            ..straight()
        };
        let top = g.hole_position(1, 1);
        let bottom = g.hole_position(1, 12);
        // row 1 sits 206.25 px left of centre, so it moves down by 2.0625 px
        assert_relative_eq!(top.y, 1141.0 - 37.5 + 2.0625, epsilon = 1e-9);
        assert_relative_eq!(bottom.y, 1141.0 - 37.5 - 2.0625, epsilon = 1e-9);
        assert_relative_eq!(top.x, g.center_x(top.y) as f64 - 206.25);
    }

    #[test]
    fn width_deviation_against_nominal() {
        let g = straight();
        assert_relative_eq!(g.nominal_width(), 487.5);
        assert_relative_eq!(g.width_deviation(), 0.5);
    }
}
