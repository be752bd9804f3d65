//! Filesystem-safe names for stored media.

/// Sanitizes a candidate filename for storage under the media directory.
///
/// - Whitespace runs become a single `-`
/// - Path separators, NUL, control chars and shell/URL-hostile characters are dropped
/// - Leading/trailing dots, dashes and underscores are trimmed
/// - Length is limited to 255 bytes (Linux NAME_MAX)
pub fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;
    const DROPPED: &[char] = &[
        '/', '\\', '?', '#', '%', '&', '"', '\'', '<', '>', '|', '*', ':', ';', '$', '`', '{', '}',
        '[', ']', '=', '!', '+',
    ];

    let mut out = String::with_capacity(name.len());
    let mut prev_dash = false;

    for c in name.chars() {
        if c.is_whitespace() || c == '-' {
            if !prev_dash {
                out.push('-');
            }
            prev_dash = true;
        } else if c == '\0' || c.is_control() || DROPPED.contains(&c) {
            continue;
        } else {
            out.push(c);
            prev_dash = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '-' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
