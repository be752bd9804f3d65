//! Single-pass percent decoding of source URLs.

/// Decodes `%XX` escapes once. Malformed escapes are kept literally and
/// invalid UTF-8 is replaced lossily. `+` is not treated as a space.
///
/// Decoding exactly once undoes the double encoding some upstream editors apply
/// (`%2520` becomes `%20`, not a space).
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes() {
        assert_eq!(
            percent_decode("http://i.imgur.com/my%20pic.png"),
            "http://i.imgur.com/my pic.png"
        );
        assert_eq!(percent_decode("caf%C3%A9.png"), "café.png");
    }

    #[test]
    fn decodes_only_once() {
        assert_eq!(percent_decode("a%2520b.png"), "a%20b.png");
    }

    #[test]
    fn malformed_escapes_kept() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%zzb"), "a%zzb");
        assert_eq!(percent_decode("a%2"), "a%2");
    }

    #[test]
    fn plus_is_literal() {
        assert_eq!(percent_decode("a+b.png"), "a+b.png");
    }
}
