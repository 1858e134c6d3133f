//! Iterative percent and HTML-entity decoding.
//!
//! Works on raw bytes: a percent escape may produce bytes that are not valid
//! UTF-8 (overlong sequences such as `%c0%ae`), and those must survive until
//! the sanitize stage can recognise them.

use std::borrow::Cow;

use percent_encoding::percent_decode;

/// Upper bound on decode rounds; nested encodings deeper than this are left
/// for the encoded-pattern backstop.
pub(crate) const MAX_DECODE_ROUNDS: usize = 5;

/// Decode until a round makes no change or the round limit is hit.
///
/// Malformed escapes (`%zz`, `&bogus;`) pass through unchanged.
pub(crate) fn decode_layers(input: &str) -> Vec<u8> {
    let mut current = input.as_bytes().to_vec();

    for _ in 0..MAX_DECODE_ROUNDS {
        let url_decoded: Cow<'_, [u8]> = percent_decode(&current).into();
        let decoded = decode_entities(&url_decoded);
        if decoded == current {
            break;
        }
        current = decoded;
    }

    current
}

/// Decode HTML entities inside the valid UTF-8 runs, copying invalid bytes through.
fn decode_entities(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.extend_from_slice(html_escape::decode_html_entities(chunk.valid()).as_bytes());
        out.extend_from_slice(chunk.invalid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(decode_layers("dir/file.html"), b"dir/file.html");
    }

    #[test]
    fn test_single_percent_layer() {
        assert_eq!(decode_layers("%2e%2e%2f"), b"../");
    }

    #[test]
    fn test_double_and_triple_percent_layers() {
        assert_eq!(decode_layers("%252e%252e%252f"), b"../");
        assert_eq!(decode_layers("%25252e%25252e%25252f"), b"../");
    }

    #[test]
    fn test_html_entities_decimal_and_hex() {
        assert_eq!(decode_layers("&#46;&#46;&#47;"), b"../");
        assert_eq!(decode_layers("&#x2e;&#x2e;&#x2f;"), b"../");
    }

    #[test]
    fn test_percent_encoded_entity() {
        // `%26` is `&`, so the entity only appears after the first round.
        assert_eq!(decode_layers("%26#46;%26#46;/"), b"../");
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        assert_eq!(decode_layers("100%zz.html"), b"100%zz.html");
        assert_eq!(decode_layers("a%2"), b"a%2");
    }

    #[test]
    fn test_overlong_bytes_survive() {
        assert_eq!(decode_layers("%c0%ae%c0%ae/"), vec![0xC0, 0xAE, 0xC0, 0xAE, b'/']);
    }

    #[test]
    fn test_plus_is_not_a_space() {
        assert_eq!(decode_layers("a+b.html"), b"a+b.html");
    }

    #[test]
    fn test_round_limit_leaves_deep_encoding() {
        // Six encoding layers: five rounds leave the innermost `%2e` behind.
        let decoded = decode_layers("%25252525252e");
        assert_eq!(decoded, b"%2e");
    }
}
