use cardscan_core::ImageError;

/// Errors returned by the card reader.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("invalid reader parameters: {reason}")]
    InvalidParams { reason: &'static str },
}
