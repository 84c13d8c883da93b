//! Front (leading) edge location.
//!
//! Cards are scanned tail-first, so the clean front edge is a horizontal
//! light-to-dark transition near the bottom of the image.

use crate::edges::EdgeModel;
use crate::params::ReaderParams;
use cardscan_core::{DebugOverlay, IntegralImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Half-length of the debug line drawn through the front edge.
const DEBUG_HALF_LENGTH: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontEdge {
    /// First background row below the card.
    pub y: i32,
    /// Card-minus-background contrast at `y`.
    pub contrast: i64,
    /// `false` when no row showed any contrast; `y` is then the image height.
    pub found: bool,
}

/// Find the row with the strongest card-above / background-below contrast.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(integral, edges, params, overlay))
)]
pub fn locate_front_edge(
    integral: &IntegralImage,
    edges: &EdgeModel,
    params: &ReaderParams,
    overlay: Option<&mut DebugOverlay>,
) -> FrontEdge {
    let p = &params.front_edge;
    let w = p.half_window;
    let height = integral.height() as i32;

    let mut best = FrontEdge {
        y: height,
        contrast: 0,
        found: false,
    };

    for y in (height - p.span_rows + 1..=height - p.skip_rows).rev() {
        let x = edges.center_x(y as f64);
        let (x0, x1) = (x.saturating_sub(w), x.saturating_add(w));
        let card = integral.window_sum(x0, y.saturating_sub(w), x1, y) as i64;
        let background = integral.window_sum(x0, y, x1, y.saturating_add(w)) as i64;
        let contrast = card - background;
        if contrast > best.contrast {
            best = FrontEdge {
                y,
                contrast,
                found: true,
            };
        }
    }

    if best.found {
        log::debug!("front edge at y={} (contrast {})", best.y, best.contrast);
    } else {
        log::warn!("no front edge contrast found, assuming y={}", best.y);
    }

    if let Some(overlay) = overlay {
        let xc = edges.center_x(best.y as f64);
        let slope = edges.right.slope;
        for x in xc - DEBUG_HALF_LENGTH..xc + DEBUG_HALF_LENGTH {
            let y = (best.y as f64 - (x - xc) as f64 * slope) as i32;
            overlay.stipple(x, y, x);
        }
    }

    best
}
