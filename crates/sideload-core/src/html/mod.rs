//! HTML scanner: parses a fragment into an arena tree, finds `<img>` elements,
//! and serializes the fragment back after in-place attribute edits.

mod parse;
mod serialize;
mod tree;

pub use parse::parse;
pub use serialize::{outer_html, serialize, start_tag};
pub use tree::{Attribute, Document, Element, Node, NodeId, NodeKind};

use crate::reference::{ExplicitSize, ImageReference, Location};

/// Image references for every `<img>` in `doc`, in document order.
///
/// A missing `src` yields an empty source URL. `size` is set only when both
/// `width` and `height` are present and start with a positive integer.
pub fn extract_images(doc: &Document) -> Vec<ImageReference> {
    doc.find_all("img")
        .into_iter()
        .map(|node| ImageReference {
            raw_match: start_tag(doc, node),
            source_url: doc.attr(node, "src").unwrap_or_default().to_string(),
            size: explicit_size(doc, node),
            location: Location::Html { node },
        })
        .collect()
}

fn explicit_size(doc: &Document, node: NodeId) -> Option<ExplicitSize> {
    let dim = |name: &str| doc.attr(node, name).and_then(leading_dimension);
    Some(ExplicitSize {
        width: dim("width")?,
        height: dim("height")?,
    })
}

/// The leading digit run of a dimension attribute: `"10px"` and `"10.5"` read
/// as 10. Zero, or no leading digits at all, is no dimension.
fn leading_dimension(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u32>().ok().filter(|&v| v > 0)
}
