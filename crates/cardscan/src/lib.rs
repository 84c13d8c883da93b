//! Facade crate for the `cardscan-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates and their most used types
//! - duplex verification (front and back scans of the same card must agree)
//! - (feature-gated) image file loading and saving through the `image` crate
//!
//! ## Quickstart
//!
//! ```no_run
//! use cardscan::io::read_card_file;
//! use cardscan::{CardReader, ReaderParams, ReadingOrder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = CardReader::new(ReaderParams::default());
//! let reading = read_card_file(&reader, "scan_0001_f.png", ReadingOrder::Front)?;
//! println!("{}", reading.text());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `cardscan::core`: image buffers, summed-area tables, edge lines, logging.
//! - `cardscan::hollerith`: punch-code table, cp037 decoding, national letters.
//! - `cardscan::reader`: the calibrating card reader and synthetic scans.
//! - `cardscan::duplex`: front/back comparison and report lines.
//! - `cardscan::io` (feature `image`): image files and parameter files.

pub use cardscan_core as core;
pub use cardscan_hollerith as hollerith;
pub use cardscan_reader as reader;

pub use cardscan_core::{CardImage, CardImageView, Polarity};
pub use cardscan_hollerith::{CodePage, National};
pub use cardscan_reader::{
    CalibrationQuality, CardReader, CardReading, ReadError, ReaderParams, ReadingOrder,
};

pub mod duplex;
#[cfg(feature = "image")]
pub mod io;
