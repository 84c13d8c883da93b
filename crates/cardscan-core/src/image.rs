//! Interleaved 8-bit card images.

use crate::ImageError;
use serde::{Deserialize, Serialize};

/// Which intensity the scanner produces for holes and background.
///
/// The reader works in the dark-hole convention; bright-hole scans are
/// inverted when the [`crate::IntegralImage`] is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    /// Holes and background are dark, card stock is light.
    #[default]
    DarkHoles,
    /// Holes and background are light, card stock is dark.
    BrightHoles,
}

impl Polarity {
    /// Map a raw sample into the dark-hole convention.
    #[inline]
    pub fn normalize(self, v: u8) -> u8 {
        match self {
            Polarity::DarkHoles => v,
            Polarity::BrightHoles => u8::MAX - v,
        }
    }
}

/// Buffer length `width * height * channels` of a valid layout.
fn buffer_len(width: usize, height: usize, channels: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    if channels != 1 && channels != 3 {
        return Err(ImageError::UnsupportedChannels { channels });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(ImageError::InvalidDimensions { width, height })
}

fn check_layout(
    width: usize,
    height: usize,
    channels: usize,
    len: usize,
) -> Result<(), ImageError> {
    let expected = buffer_len(width, height, channels)?;
    if len != expected {
        return Err(ImageError::InvalidBuffer { expected, got: len });
    }
    Ok(())
}

/// Borrowed image: row-major, channels interleaved, `len = w * h * c`.
#[derive(Clone, Copy, Debug)]
pub struct CardImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> CardImageView<'a> {
    /// Wrap a raw buffer, checking its length against the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, ImageError> {
        check_layout(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel view.
    pub fn gray(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        Self::new(width, height, 1, data)
    }

    /// Sample of channel `c` at `(x, y)`; zero outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32, c: usize) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.data[(y as usize * self.width + x as usize) * self.channels + c]
    }

    /// Sum of all channels at `(x, y)`.
    #[inline]
    pub fn pixel_sum(&self, x: i32, y: i32) -> u32 {
        (0..self.channels).map(|c| self.get(x, y, c) as u32).sum()
    }
}

/// Owned image with the same layout as [`CardImageView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl CardImage {
    /// Image filled with a constant value.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        value: u8,
    ) -> Result<Self, ImageError> {
        let len = buffer_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        check_layout(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> CardImageView<'_> {
        CardImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// Set every channel of `(x, y)`; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let base = (y as usize * self.width + x as usize) * self.channels;
        self.data[base..base + self.channels].fill(value);
    }

    /// Fill the half-open rectangle `[x0, x1) x [y0, y1)`, clipped to the image.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: u8) {
        let xa = x0.clamp(0, self.width as i32) as usize;
        let xb = x1.clamp(0, self.width as i32) as usize;
        let ya = y0.clamp(0, self.height as i32) as usize;
        let yb = y1.clamp(0, self.height as i32) as usize;
        if xa >= xb {
            return;
        }
        for y in ya..yb {
            let row = y * self.width;
            self.data[(row + xa) * self.channels..(row + xb) * self.channels].fill(value);
        }
    }
}
