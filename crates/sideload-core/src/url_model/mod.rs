//! URL normalization and filename derivation for sideloaded images.

mod decode;
mod image_name;
mod sanitize;

pub use decode::percent_decode;
pub use image_name::image_filename;
pub use sanitize::sanitize_filename;

/// True if `url` begins with any of `prefixes`. Empty prefixes are ignored.
pub fn has_local_prefix(url: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|p| !p.is_empty() && url.starts_with(p.as_str()))
}
