//! Accepted image extensions and the stored filename derived from a source URL.

use regex::Regex;
use std::sync::LazyLock;

use super::sanitize::sanitize_filename;

/// A path ending in an accepted image extension, followed only by an optional
/// query string or fragment.
static IMAGE_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^?#]+\.(?:jpeg|jpg|jpe|gif|png))(?:[?#].*)?$")
        .expect("image path regex should compile")
});

/// Filename to store a sideloaded image under, or `None` if the URL does not
/// carry an accepted image extension (jpg, jpeg, jpe, gif, png; any case).
///
/// - `image_filename("http://i.imgur.com/a.png?x=1")` → `Some("a.png")`
/// - `image_filename("http://i.imgur.com/page.html")` → `None`
pub fn image_filename(url: &str) -> Option<String> {
    let matched = IMAGE_PATH_REGEX.captures(url)?.get(1)?.as_str();
    let base = matched.rsplit('/').next().unwrap_or(matched);
    let name = sanitize_filename(base);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
