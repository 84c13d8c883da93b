//! Reader for scanned 80-column punched cards.
//!
//! The pipeline calibrates each scan on its own before sampling any holes:
//!
//! 1. [`edges`]: least-squares lines through the left and right card edges,
//! 2. [`front_edge`]: the row where the leading card edge meets the background,
//! 3. [`geometry`]: ideal hole centres from the card outline and the standard
//!    hole pitch,
//! 4. [`holes`]: a small search around each ideal centre, with found holes
//!    feeding a slowly adapting drift correction.
//!
//! [`CardReader`] runs all stages and returns a [`CardReading`] holding the
//! 80 column values, the decoded text and a calibration quality report.
//!
//! ```
//! use cardscan_reader::{CardReader, ReaderParams, ReadingOrder, SyntheticCard};
//! use cardscan_hollerith::CodePage;
//!
//! let card = SyntheticCard::from_text("HELLO", CodePage::Cp037).unwrap();
//! let image = card.render_front().unwrap();
//!
//! let reader = CardReader::new(ReaderParams::default());
//! let reading = reader.read(&image.view(), ReadingOrder::Front).unwrap();
//! assert!(reading.text().starts_with("HELLO "));
//! ```

pub mod edges;
pub mod front_edge;
pub mod geometry;
pub mod holes;
pub mod params;
mod reader;
pub mod synthetic;

pub use edges::{EdgeModel, EdgeQuality, EdgeSample};
pub use front_edge::FrontEdge;
pub use geometry::CardGeometry;
pub use holes::{Drift, HoleGrid, HoleScan, HoleScanner, ReadingOrder};
pub use params::{EdgeSearchParams, FrontEdgeParams, HoleScanParams, ReaderParams};
pub use reader::{CalibrationQuality, CardReader, CardReading, ReadError};
pub use synthetic::SyntheticCard;
