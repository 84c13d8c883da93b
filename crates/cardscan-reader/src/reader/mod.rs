//! Card reading pipeline.
//!
//! This module wires together edge estimation, front edge location, the
//! geometry model and the adaptive hole scanner, and packages the result.

mod error;
mod pipeline;
mod result;

pub use error::ReadError;
pub use pipeline::CardReader;
pub use result::{CalibrationQuality, CardReading};
