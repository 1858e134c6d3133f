//! Byte and Unicode sanitization of decoded path text.

/// Turn decoded bytes into clean text.
///
/// - overlong two-byte encodings of `.` (`C0 AE`) and `/` (`C0 AF`) become ASCII
/// - any other malformed UTF-8 byte is dropped
/// - control characters are removed, except tab, newline and carriage return,
///   which are kept so the traversal check still sees them
/// - look-alike separators and dots are mapped to ASCII
pub(crate) fn sanitize(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match &bytes[i..] {
            [0xC0, 0xAE, ..] => {
                out.push('.');
                i += 2;
                continue;
            }
            [0xC0, 0xAF, ..] => {
                out.push('/');
                i += 2;
                continue;
            }
            _ => {}
        }

        let Some((ch, len)) = decode_char(&bytes[i..]) else {
            i += 1;
            continue;
        };
        i += len;

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }
        out.push(normalize_lookalike(ch));
    }

    out
}

/// Decode the first well-formed UTF-8 character, if the input starts with one.
fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let len = match bytes.first()? {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let candidate = bytes.get(..len)?;
    let ch = std::str::from_utf8(candidate).ok()?.chars().next()?;
    Some((ch, len))
}

fn normalize_lookalike(ch: char) -> char {
    match ch {
        // division slash, fraction slash, fullwidth solidus
        '\u{2215}' | '\u{2044}' | '\u{FF0F}' => '/',
        // fullwidth full stop
        '\u{FF0E}' => '.',
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(sanitize(b"dir/file.html"), "dir/file.html");
    }

    #[test]
    fn test_overlong_dot_and_slash() {
        assert_eq!(sanitize(&[0xC0, 0xAE, 0xC0, 0xAE, 0xC0, 0xAF]), "../");
    }

    #[test]
    fn test_malformed_bytes_dropped() {
        assert_eq!(sanitize(&[b'a', 0xFF, b'b', 0xC3, b'c']), "abc");
    }

    #[test]
    fn test_valid_multibyte_kept() {
        assert_eq!(sanitize("café/ünï.html".as_bytes()), "café/ünï.html");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(sanitize(b"a\x00b\x0bc\x0cd\x7fe"), "abcde");
        assert_eq!(sanitize(b"a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_lookalike_separators() {
        assert_eq!(sanitize("a\u{2215}b\u{2044}c\u{FF0F}d".as_bytes()), "a/b/c/d");
        assert_eq!(sanitize("\u{FF0E}\u{FF0E}".as_bytes()), "..");
    }
}
