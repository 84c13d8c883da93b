//! Summed-area table over all channels of a card image.

use crate::{CardImageView, Polarity};

/// Constant-time rectangular sums.
///
/// Samples are normalized to the dark-hole convention with the given
/// [`Polarity`] and summed over every channel of a pixel. Windows are
/// half-open and clipped to the image; pixels outside contribute zero.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    channels: usize,
    // (width + 1) x (height + 1), first row and column are zero
    table: Vec<u64>,
}

impl IntegralImage {
    pub fn new(src: &CardImageView<'_>, polarity: Polarity) -> Self {
        let stride = src.width + 1;
        let mut table = vec![0u64; stride * (src.height + 1)];

        for y in 0..src.height {
            let mut row_acc = 0u64;
            let row = &src.data[y * src.width * src.channels..(y + 1) * src.width * src.channels];
            for x in 0..src.width {
                let px = &row[x * src.channels..(x + 1) * src.channels];
                row_acc += px
                    .iter()
                    .map(|&v| polarity.normalize(v) as u64)
                    .sum::<u64>();
                table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_acc;
            }
        }

        Self {
            width: src.width,
            height: src.height,
            channels: src.channels,
            table,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sum over `[x0, x1) x [y0, y1)`.
    #[inline]
    pub fn window_sum(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> u64 {
        let xa = x0.clamp(0, self.width as i32) as usize;
        let xb = x1.clamp(0, self.width as i32) as usize;
        let ya = y0.clamp(0, self.height as i32) as usize;
        let yb = y1.clamp(0, self.height as i32) as usize;
        if xa >= xb || ya >= yb {
            return 0;
        }
        let stride = self.width + 1;
        self.table[yb * stride + xb] + self.table[ya * stride + xa]
            - self.table[ya * stride + xb]
            - self.table[yb * stride + xa]
    }

    /// Sum over `[x0, x1)` of a single row.
    #[inline]
    pub fn row_sum(&self, y: i32, x0: i32, x1: i32) -> u64 {
        self.window_sum(x0, y, x1, y + 1)
    }

    /// Sum over the closed box of half-extents `half_x`, `half_y` centred at `(cx, cy)`.
    #[inline]
    pub fn box_sum(&self, cx: i32, cy: i32, half_x: i32, half_y: i32) -> u64 {
        self.window_sum(
            cx.saturating_sub(half_x),
            cy.saturating_sub(half_y),
            cx.saturating_add(half_x).saturating_add(1),
            cy.saturating_add(half_y).saturating_add(1),
        )
    }
}
