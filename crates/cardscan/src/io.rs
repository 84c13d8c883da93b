//! Image and parameter files.

use std::path::{Path, PathBuf};

use cardscan_core::{CardImage, ImageError};
use cardscan_reader::{CardReader, CardReading, ReadError, ReaderParams, ReadingOrder};
use image::ColorType;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while loading or saving card files.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reader parameters in {path}: {source}")]
    Params {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("image {path} is too large ({width}x{height})")]
    TooLarge {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Load a scan: grey images (with or without alpha) get one channel,
/// everything else three.
pub fn load_card_image(path: impl AsRef<Path>) -> Result<CardImage, LoadError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = (img.width() as usize, img.height() as usize);

    let image = if img.color().has_color() {
        CardImage::from_raw(width, height, 3, img.into_rgb8().into_raw())?
    } else {
        CardImage::from_raw(width, height, 1, img.into_luma8().into_raw())?
    };
    log::debug!(
        "loaded {} ({}x{}, {} channel(s))",
        path.display(),
        width,
        height,
        image.channels
    );
    Ok(image)
}

/// Save a card image; the format follows the file extension.
pub fn save_card_image(image: &CardImage, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let too_large = || LoadError::TooLarge {
        path: path.to_path_buf(),
        width: image.width,
        height: image.height,
    };
    let width = u32::try_from(image.width).map_err(|_| too_large())?;
    let height = u32::try_from(image.height).map_err(|_| too_large())?;
    let color = if image.channels == 3 {
        ColorType::Rgb8
    } else {
        ColorType::L8
    };
    image::save_buffer(path, &image.data, width, height, color).map_err(|source| {
        LoadError::Encode {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reader parameters from a JSON file; missing fields keep their defaults.
pub fn load_params(path: impl AsRef<Path>) -> Result<ReaderParams, LoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Params {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and read one card face.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(reader, path), fields(path = %path.as_ref().display()))
)]
pub fn read_card_file(
    reader: &CardReader,
    path: impl AsRef<Path>,
    order: ReadingOrder,
) -> Result<CardReading, LoadError> {
    let image = load_card_image(path)?;
    Ok(reader.read(&image.view(), order)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_hollerith::CodePage;
    use cardscan_reader::SyntheticCard;

    #[test]
    fn png_round_trip_reads_the_same_card() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("card.png");
        let card = SyntheticCard::from_text("IDENTIFICATION DIVISION.", CodePage::Cp037)
            .expect("encodable");
        save_card_image(&card.render_front().expect("render"), &path).expect("save");

        let loaded = load_card_image(&path).expect("load");
        assert_eq!(loaded.channels, 1);
        assert_eq!((loaded.width, loaded.height), (590, 1181));

        let reader = CardReader::new(ReaderParams::default());
        let reading = read_card_file(&reader, &path, ReadingOrder::Front).expect("read");
        assert_eq!(reading.values(), card.values());
    }

    #[test]
    fn colour_images_keep_three_channels() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rgb.png");
        let img = CardImage::filled(8, 4, 3, 7).expect("image");
        save_card_image(&img, &path).expect("save");
        let loaded = load_card_image(&path).expect("load");
        assert_eq!(loaded, img);
    }

    #[test]
    fn params_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"dpi": 300.0, "holes": {"max_drift": 2.5}}"#).expect("write");
        let params = load_params(&path).expect("params");
        assert_eq!(params.dpi, 300.0);
        assert_eq!(params.holes.max_drift, Some(2.5));
        assert_eq!(params.holes.threshold, 50);
    }

    #[test]
    fn missing_and_malformed_files_are_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load_card_image(dir.path().join("missing.png")),
            Err(LoadError::Decode { .. })
        ));
        assert!(matches!(
            load_params(dir.path().join("missing.json")),
            Err(LoadError::Io { .. })
        ));
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").expect("write");
        assert!(matches!(load_params(&bad), Err(LoadError::Params { .. })));
    }
}
