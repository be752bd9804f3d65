//! Markdown image scanner: finds `![alt](url)` mentions and rewrites their URLs by position.

use regex::Regex;
use std::sync::LazyLock;

use crate::reference::{ImageReference, Location};

/// `![` alt `](` non-whitespace url `)`; the alt text is not captured.
static MARKDOWN_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\((\S*?)\)").expect("markdown image regex should compile")
});

/// Returns every markdown image reference in `content`, left to right.
pub fn scan(content: &str) -> Vec<ImageReference> {
    MARKDOWN_IMAGE_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = caps.get(1)?;
            Some(ImageReference {
                raw_match: whole.as_str().to_string(),
                source_url: url.as_str().to_string(),
                size: None,
                location: Location::Markdown {
                    span: whole.range(),
                    url: url.range(),
                },
            })
        })
        .collect()
}

/// Replaces the URL of each given reference with its new URL, at the exact
/// offset it was scanned from. Everything else in `content` is kept verbatim.
///
/// References must come from `scan(content)`; non-markdown references are ignored.
pub fn rewrite<'a, I>(content: &str, edits: I) -> String
where
    I: IntoIterator<Item = (&'a ImageReference, &'a str)>,
{
    let mut spans: Vec<(std::ops::Range<usize>, &str)> = edits
        .into_iter()
        .filter_map(|(reference, new_url)| match &reference.location {
            Location::Markdown { url, .. } => Some((url.clone(), new_url)),
            Location::Html { .. } => None,
        })
        .collect();
    spans.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for (range, new_url) in spans {
        if range.start < cursor || range.end > content.len() {
            tracing::debug!(?range, "skipping overlapping markdown edit");
            continue;
        }
        out.push_str(&content[cursor..range.start]);
        out.push_str(new_url);
        cursor = range.end;
    }
    out.push_str(&content[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_single_reference() {
        let refs = scan("See ![pic](http://i.imgur.com/a.png) here");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].raw_match, "![pic](http://i.imgur.com/a.png)");
        assert_eq!(refs[0].source_url, "http://i.imgur.com/a.png");
        assert!(refs[0].size.is_none());
        assert!(!refs[0].is_html());
    }

    #[test]
    fn scan_in_order_with_empty_alt() {
        let refs = scan("![](http://a/1.png) and ![second](http://a/2.gif)");
        let urls: Vec<_> = refs.iter().map(|r| r.source_url.as_str()).collect();
        assert_eq!(urls, ["http://a/1.png", "http://a/2.gif"]);
    }

    #[test]
    fn scan_ignores_links_and_whitespace_urls() {
        assert!(scan("[not an image](http://a/1.png)").is_empty());
        assert!(scan("![pic](http://a/ 1.png)").is_empty());
        assert!(scan("plain text").is_empty());
    }

    #[test]
    fn scan_empty_url() {
        let refs = scan("![pic]()");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source_url, "");
    }

    #[test]
    fn rewrite_replaces_only_url() {
        let content = "See ![http://i.imgur.com/a.png](http://i.imgur.com/a.png)!";
        let refs = scan(content);
        let out = rewrite(content, [(&refs[0], "http://local/a.png")]);
        assert_eq!(out, "See ![http://i.imgur.com/a.png](http://local/a.png)!");
    }

    #[test]
    fn rewrite_is_positional_for_duplicates() {
        let content = "![x](http://a/1.png) ![x](http://a/1.png)";
        let refs = scan(content);
        assert_eq!(refs.len(), 2);
        let out = rewrite(content, [(&refs[1], "L2")]);
        assert_eq!(out, "![x](http://a/1.png) ![x](L2)");
        let out = rewrite(content, [(&refs[1], "L2"), (&refs[0], "L1")]);
        assert_eq!(out, "![x](L1) ![x](L2)");
    }

    #[test]
    fn rewrite_without_edits_is_identity() {
        let content = "![x](http://a/1.png)";
        assert_eq!(rewrite(content, std::iter::empty::<(&ImageReference, &str)>()), content);
    }
}
