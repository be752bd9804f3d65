//! Fetch and persist failures reported by asset stores.

use thiserror::Error;

/// The bytes could not be downloaded to a temporary location.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("transfer failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("response larger than {max} bytes")]
    TooLarge { max: u64 },
    #[error("temp file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// A temporary download could not be turned into a stored asset.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("not a recognised image: {0}")]
    NotAnImage(String),
    #[error("invalid filename {0:?}")]
    InvalidFilename(String),
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}
