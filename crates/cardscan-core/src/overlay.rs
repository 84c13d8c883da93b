//! Debug annotation layer.
//!
//! Stages draw into a [`DebugOverlay`] instead of the scanned image, so the
//! source stays borrowed immutably. [`DebugOverlay::render`] merges both.

use crate::{CardImage, CardImageView};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Mark {
    #[default]
    None,
    Set(u8),
    /// Number of pending `v / 3 + 128` dimming passes.
    Dim(u8),
}

#[derive(Clone, Debug)]
pub struct DebugOverlay {
    width: usize,
    height: usize,
    marks: Vec<Mark>,
}

#[inline]
fn dim(v: u8) -> u8 {
    v / 3 + 128
}

impl DebugOverlay {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            marks: vec![Mark::None; width * height],
        }
    }

    pub fn for_view(view: &CardImageView<'_>) -> Self {
        Self::new(view.width, view.height)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Overwrite `(x, y)` with `value` in every channel.
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some(i) = self.index(x, y) {
            self.marks[i] = Mark::Set(value);
        }
    }

    /// Dashed-line helper: white on 8 of every 16 steps of `phase`, black otherwise.
    pub fn stipple(&mut self, x: i32, y: i32, phase: i32) {
        let value = if phase & 8 != 0 { 255 } else { 0 };
        self.set(x, y, value);
    }

    /// Rectangle outline of half-extents `half_x`, `half_y` around `(cx, cy)`.
    pub fn outline(&mut self, cx: i32, cy: i32, half_x: i32, half_y: i32, value: u8) {
        for x in cx - half_x..=cx + half_x {
            self.set(x, cy - half_y, value);
            self.set(x, cy + half_y, value);
        }
        for y in cy - half_y..=cy + half_y {
            self.set(cx - half_x, y, value);
            self.set(cx + half_x, y, value);
        }
    }

    /// Dim the closed box of half-extents `half_x`, `half_y` around `(cx, cy)`.
    pub fn dim_box(&mut self, cx: i32, cy: i32, half_x: i32, half_y: i32) {
        for y in cy - half_y..=cy + half_y {
            for x in cx - half_x..=cx + half_x {
                let Some(i) = self.index(x, y) else {
                    continue;
                };
                self.marks[i] = match self.marks[i] {
                    Mark::None => Mark::Dim(1),
                    Mark::Set(v) => Mark::Set(dim(v)),
                    Mark::Dim(n) => Mark::Dim(n.saturating_add(1)),
                };
            }
        }
    }

    /// Number of annotated pixels.
    pub fn marked(&self) -> usize {
        self.marks.iter().filter(|m| **m != Mark::None).count()
    }

    /// Merge the annotations with `src` into a new image.
    ///
    /// Pixels outside the overlay's extent are copied unchanged.
    pub fn render(&self, src: &CardImageView<'_>) -> CardImage {
        let mut data = src.data.to_vec();
        let rows = self.height.min(src.height);
        let cols = self.width.min(src.width);
        for y in 0..rows {
            for x in 0..cols {
                let base = (y * src.width + x) * src.channels;
                let px = &mut data[base..base + src.channels];
                match self.marks[y * self.width + x] {
                    Mark::None => {}
                    Mark::Set(v) => px.fill(v),
                    Mark::Dim(n) => {
                        for v in px.iter_mut() {
                            for _ in 0..n {
                                *v = dim(*v);
                            }
                        }
                    }
                }
            }
        }
        CardImage {
            width: src.width,
            height: src.height,
            channels: src.channels,
            data,
        }
    }
}
