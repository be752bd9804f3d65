//! Asset store boundary: fetch bytes to a temporary location, persist them as
//! an asset owned by a post, and resolve an asset to a display URL and size.

mod error;
mod fetch;
mod local;

pub use error::{FetchError, PersistError};
pub use fetch::{download_to_temp, TempDownload};
pub use local::{constrain_dimensions, LocalAssetStore, StoredAsset};

use serde::Serialize;

use crate::content::OwnerId;

/// Requested display size when resolving an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// Original size.
    Full,
    /// Fit (or, with `crop`, fill exactly) a `width` x `height` box.
    Box { width: u32, height: u32, crop: bool },
}

/// A display URL with the dimensions it should be shown at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Storage for sideloaded images.
///
/// `Temp` must release its resource when dropped: the engine drops it on every
/// failure path. `persist` takes ownership so a failed persist also releases it.
pub trait AssetStore {
    type Temp;
    type Handle;

    /// Downloads `url` to a temporary location. Blocking.
    fn fetch_to_temp(&self, url: &str) -> Result<Self::Temp, FetchError>;

    /// Stores the temporary file as a new asset named after `filename`, attached to `owner`.
    fn persist(
        &self,
        temp: Self::Temp,
        filename: &str,
        owner: OwnerId,
    ) -> Result<Self::Handle, PersistError>;

    /// Display URL and size for an asset, or `None` if it cannot be resolved.
    fn resolve(&self, handle: &Self::Handle, size: SizeSpec) -> Option<ResolvedImage>;

    /// Whether `SizeSpec::Box { crop: true, .. }` yields exactly the requested box.
    fn supports_crop(&self) -> bool {
        false
    }
}
