//! Image references discovered by the scanners.

use serde::Serialize;
use std::ops::Range;

use crate::html::NodeId;

/// Explicit display size taken from an `<img>` element's `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplicitSize {
    pub width: u32,
    pub height: u32,
}

/// Where a reference lives, so it can be rewritten in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// Byte ranges into the scanned text: the whole `![alt](url)` and the url inside it.
    Markdown { span: Range<usize>, url: Range<usize> },
    /// An `<img>` element in a parsed [`crate::html::Document`].
    Html { node: NodeId },
}

/// One discovered image mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    /// The mention as text: the exact markdown match, or the `<img>` start tag
    /// as re-serialized from the parsed element.
    pub raw_match: String,
    /// Source URL (character references decoded for HTML); may still be
    /// percent-encoded.
    pub source_url: String,
    /// Only set for HTML references whose `width` and `height` both start with a positive integer.
    pub size: Option<ExplicitSize>,
    pub location: Location,
}

impl ImageReference {
    pub fn is_html(&self) -> bool {
        matches!(self.location, Location::Html { .. })
    }
}
