//! Core types and utilities for reading scanned punched cards.
//!
//! This crate is intentionally small. It knows nothing about card geometry
//! or hole codes; it only provides the image plumbing the reader is built on:
//! borrowed/owned image buffers, fast rectangular sums, the linear edge model
//! and a debug annotation layer.

mod error;
mod image;
mod integral;
mod line;
mod logger;
mod overlay;

pub use error::ImageError;
pub use image::{CardImage, CardImageView, Polarity};
pub use integral::IntegralImage;
pub use line::{fit_line, EdgeLine};
pub use overlay::DebugOverlay;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
