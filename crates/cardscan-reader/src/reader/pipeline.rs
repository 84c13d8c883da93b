use super::{CalibrationQuality, CardReading, ReadError};
use crate::edges::estimate_edges;
use crate::front_edge::locate_front_edge;
use crate::geometry::CardGeometry;
use crate::holes::{HoleScanner, ReadingOrder};
use crate::params::ReaderParams;
use cardscan_core::{CardImage, CardImageView, DebugOverlay, IntegralImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Reads one face of a scanned punched card.
///
/// The reader holds only its configuration; every call to [`CardReader::read`]
/// starts from a zero drift, so a single reader can be shared between threads.
#[derive(Clone, Debug, Default)]
pub struct CardReader {
    params: ReaderParams,
}

impl CardReader {
    pub fn new(params: ReaderParams) -> Self {
        Self { params }
    }

    /// Reader parameters.
    #[inline]
    pub fn params(&self) -> &ReaderParams {
        &self.params
    }

    /// Decode the 80 columns of one card face.
    pub fn read(
        &self,
        image: &CardImageView<'_>,
        order: ReadingOrder,
    ) -> Result<CardReading, ReadError> {
        self.run(image, order, None)
    }

    /// Like [`CardReader::read`], also rendering the calibration and hole
    /// annotations over a copy of the source.
    pub fn read_with_debug(
        &self,
        image: &CardImageView<'_>,
        order: ReadingOrder,
    ) -> Result<(CardReading, CardImage), ReadError> {
        let mut overlay = DebugOverlay::for_view(image);
        let reading = self.run(image, order, Some(&mut overlay))?;
        Ok((reading, overlay.render(image)))
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image, overlay),
            fields(width = image.width, height = image.height, channels = image.channels)
        )
    )]
    fn run(
        &self,
        image: &CardImageView<'_>,
        order: ReadingOrder,
        mut overlay: Option<&mut DebugOverlay>,
    ) -> Result<CardReading, ReadError> {
        self.params
            .validate()
            .map_err(|reason| ReadError::InvalidParams { reason })?;
        // the fields are public, so the layout is re-checked here
        let image = CardImageView::new(image.width, image.height, image.channels, image.data)?;

        let params = &self.params;
        let integral = IntegralImage::new(&image, params.polarity);

        let edges = estimate_edges(&integral, params, overlay.as_deref_mut());
        let front_edge = locate_front_edge(&integral, &edges, params, overlay.as_deref_mut());
        let geometry = CardGeometry::new(&edges, &front_edge, params.dpi);

        let scan = HoleScanner::new(&integral, &params.holes).scan(
            &geometry,
            order,
            overlay.as_deref_mut(),
        );

        let quality = CalibrationQuality {
            edges: edges.quality,
            front_edge_found: front_edge.found,
            width_deviation_px: geometry.width_deviation(),
            punched: scan.punched,
            peak_drift_px: scan.peak_drift,
        };
        log::debug!(
            "{} face read: {} holes, width deviation {:+.2} px",
            order.label(),
            quality.punched,
            quality.width_deviation_px
        );
        if quality.is_degraded() {
            log::warn!("{} face calibration degraded: {:?}", order.label(), quality);
        }

        let values = scan.grid.column_values();
        Ok(CardReading {
            order,
            edges,
            front_edge,
            geometry,
            grid: scan.grid,
            values,
            drift: scan.drift,
            quality,
        })
    }
}
