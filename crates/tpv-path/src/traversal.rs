//! Directory-traversal pattern detection.

/// Whitespace-padded two-dot sequences.
const PADDED_PATTERNS: &[&str] = &[". .", ".\t.", ". ./", ".\t./", " ../", "\t../"];

/// Encoded two-dot sequences, matched case-insensitively. Decoding should
/// already have removed these; they are a backstop for encodings nested
/// deeper than the decode round limit.
const ENCODED_PATTERNS: &[&str] = &["%2e%2e", "&#46;&#46;", "&#x2e;&#x2e;"];

/// Whether `path` contains any form of parent-directory reference.
///
/// Any `..` counts, even where lexical cleaning would keep the result under
/// the root (`a/b/../c`).
pub(crate) fn contains_traversal(path: &str) -> bool {
    if path.contains("..") {
        return true;
    }

    if PADDED_PATTERNS.iter().any(|p| path.contains(p)) {
        return true;
    }

    let lower = path.to_ascii_lowercase();
    ENCODED_PATTERNS.iter().any(|p| lower.contains(p))
}
