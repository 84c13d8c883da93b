use crate::edges::{EdgeModel, EdgeQuality};
use crate::front_edge::FrontEdge;
use crate::geometry::CardGeometry;
use crate::holes::{Drift, HoleGrid, ReadingOrder};
use cardscan_hollerith::{decode_text, ebcdic_bytes, CodePage};
use serde::{Deserialize, Serialize};

/// Card width mismatch above which the calibration is reported as degraded.
const WIDTH_TOLERANCE_PX: f64 = 10.0;

/// How much the calibration of one read can be trusted.
///
/// Degraded calibration never fails a read; it is only reported here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationQuality {
    pub edges: EdgeQuality,
    pub front_edge_found: bool,
    /// Measured minus nominal card width, pixels.
    pub width_deviation_px: f64,
    pub punched: usize,
    /// Largest drift magnitude reached while scanning, pixels.
    pub peak_drift_px: f64,
}

impl CalibrationQuality {
    pub fn is_degraded(&self) -> bool {
        !self.edges.is_clean()
            || !self.front_edge_found
            || self.width_deviation_px.abs() > WIDTH_TOLERANCE_PX
    }
}

/// Output of reading one card face.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardReading {
    pub order: ReadingOrder,
    pub edges: EdgeModel,
    pub front_edge: FrontEdge,
    pub geometry: CardGeometry,
    pub grid: HoleGrid,
    /// One 12-bit punch pattern per column.
    pub values: Vec<u16>,
    /// Drift at the end of the scan.
    pub drift: Drift,
    pub quality: CalibrationQuality,
}

impl CardReading {
    /// Column values, column 1 first.
    #[inline]
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    #[inline]
    pub fn grid(&self) -> &HoleGrid {
        &self.grid
    }

    /// EBCDIC byte per column; unmapped patterns give `0x00`.
    pub fn ebcdic(&self) -> Vec<u8> {
        ebcdic_bytes(&self.values)
    }

    /// Card text in the default code page (cp037).
    pub fn text(&self) -> String {
        self.text_with(CodePage::default())
    }

    pub fn text_with(&self, code_page: CodePage) -> String {
        decode_text(&self.values, code_page)
    }

    /// Text line followed by the twelve hole rows.
    pub fn dump(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(1 + cardscan_hollerith::ROWS);
        lines.push(self.text());
        lines.extend(self.grid.rows_ascii());
        lines
    }

    #[inline]
    pub fn quality(&self) -> &CalibrationQuality {
        &self.quality
    }
}
