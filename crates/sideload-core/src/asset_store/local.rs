//! Filesystem-backed asset store: `<media_dir>/<owner>/<name>` served under the media URL.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

use super::error::{FetchError, PersistError};
use super::fetch::{download_to_temp, TempDownload};
use super::{AssetStore, ResolvedImage, SizeSpec};
use crate::config::{FetchConfig, SideloadConfig};
use crate::content::OwnerId;
use crate::url_model::sanitize_filename;

/// Directory under the media dir that holds in-flight downloads (same filesystem,
/// so persisting is a rename).
const TEMP_DIR: &str = ".tmp";

/// A persisted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub owner: OwnerId,
    /// Path relative to the media dir, `/`-separated.
    pub relative_path: String,
    pub filename: String,
    /// Intrinsic size.
    pub width: u32,
    pub height: u32,
}

pub struct LocalAssetStore {
    media_dir: PathBuf,
    tmp_dir: PathBuf,
    media_url: Url,
    fetch: FetchConfig,
    persisted: Mutex<Vec<StoredAsset>>,
}

impl LocalAssetStore {
    /// Creates the media and temp directories if needed.
    pub fn new(media_dir: impl Into<PathBuf>, media_url: &str, fetch: FetchConfig) -> Result<Self> {
        let media_dir = media_dir.into();
        let tmp_dir = media_dir.join(TEMP_DIR);
        fs::create_dir_all(&tmp_dir)
            .with_context(|| format!("failed to create {}", tmp_dir.display()))?;
        let media_url =
            Url::parse(media_url).with_context(|| format!("invalid media URL {media_url:?}"))?;
        Ok(Self {
            media_dir,
            tmp_dir,
            media_url,
            fetch,
            persisted: Mutex::new(Vec::new()),
        })
    }

    pub fn from_config(cfg: &SideloadConfig) -> Result<Self> {
        Self::new(
            cfg.resolve_media_dir()?,
            &cfg.media_base_url(),
            cfg.fetch.clone(),
        )
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Assets persisted since the last call, oldest first.
    pub fn take_persisted(&self) -> Vec<StoredAsset> {
        match self.persisted.lock() {
            Ok(mut list) => std::mem::take(&mut *list),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn record(&self, asset: StoredAsset) {
        match self.persisted.lock() {
            Ok(mut list) => list.push(asset),
            Err(poisoned) => poisoned.into_inner().push(asset),
        }
    }
}

impl AssetStore for LocalAssetStore {
    type Temp = TempDownload;
    type Handle = StoredAsset;

    fn fetch_to_temp(&self, url: &str) -> Result<TempDownload, FetchError> {
        download_to_temp(url, &self.tmp_dir, &self.fetch)
    }

    fn persist(
        &self,
        temp: TempDownload,
        filename: &str,
        owner: OwnerId,
    ) -> Result<StoredAsset, PersistError> {
        let name = sanitize_filename(filename);
        if name.is_empty() {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }
        let size =
            imagesize::size(temp.path()).map_err(|e| PersistError::NotAnImage(e.to_string()))?;

        let dir = self.media_dir.join(owner.to_string());
        fs::create_dir_all(&dir)?;
        let unique = unique_filename(&dir, &name);
        temp.persist_to(&dir.join(&unique))?;

        let asset = StoredAsset {
            owner,
            relative_path: format!("{}/{}", owner, unique),
            filename: unique,
            width: u32::try_from(size.width).unwrap_or(u32::MAX),
            height: u32::try_from(size.height).unwrap_or(u32::MAX),
        };
        tracing::debug!(path = %asset.relative_path, width = asset.width, height = asset.height, "persisted asset");
        self.record(asset.clone());
        Ok(asset)
    }

    fn resolve(&self, handle: &StoredAsset, size: SizeSpec) -> Option<ResolvedImage> {
        let url = self.media_url.join(&handle.relative_path).ok()?;
        let (width, height) = match size {
            SizeSpec::Full => (handle.width, handle.height),
            SizeSpec::Box {
                width,
                height,
                crop,
            } => {
                if crop && self.supports_crop() {
                    (width, height)
                } else {
                    constrain_dimensions(handle.width, handle.height, width, height)
                }
            }
        };
        Some(ResolvedImage {
            url: url.to_string(),
            width,
            height,
        })
    }
}

/// `name`, or `stem-N.ext` with the smallest N that does not exist in `dir`.
fn unique_filename(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        })
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or_else(|| name.to_string())
}

/// Scales `width` x `height` down to fit inside `max_width` x `max_height`,
/// keeping the aspect ratio. Never upscales. Unknown (zero) intrinsic sizes
/// resolve to the box itself.
pub fn constrain_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width, max_height);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let scaled = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
    (scaled(width), scaled(height))
}
