//! Per-reference sideload failures. None of them abort sibling references.

use serde::Serialize;
use thiserror::Error;

use crate::asset_store::{FetchError, PersistError, ResolvedImage};

/// Why a reference is skipped without any fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    EmptySource,
    /// Already hosted by this site.
    LocalSource,
    NotAllowed,
    UnsupportedExtension,
}

impl IneligibleReason {
    pub fn as_str(self) -> &'static str {
        match self {
            IneligibleReason::EmptySource => "empty source",
            IneligibleReason::LocalSource => "local source",
            IneligibleReason::NotAllowed => "not allow-listed",
            IneligibleReason::UnsupportedExtension => "unsupported extension",
        }
    }
}

#[derive(Debug, Error)]
pub enum SideloadError {
    #[error("ineligible: {}", .0.as_str())]
    Ineligible(IneligibleReason),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),
    #[error("stored asset has no usable URL")]
    Resolution,
}

impl SideloadError {
    pub fn is_ineligible(&self) -> bool {
        matches!(self, SideloadError::Ineligible(_))
    }
}

/// Outcome of sideloading one reference.
pub type SideloadResult = Result<ResolvedImage, SideloadError>;
