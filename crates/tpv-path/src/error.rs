//! Path rejection errors.

/// Reason a requested path was refused.
///
/// Every variant renders as the same generic `invalid path` message so the
/// untrusted caller cannot learn which bypass was detected. Use
/// [`PathError::reason`] for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Unix-rooted path or a drive-letter prefix (`C:`).
    #[error("invalid path")]
    AbsolutePathRejected,
    /// UNC-style network path (`\\server` or `//server`).
    #[error("invalid path")]
    UncPathRejected,
    /// Parent-directory sequence, encoded variant, or null byte.
    #[error("invalid path")]
    TraversalDetected,
    /// Joined path does not stay under the root.
    #[error("invalid path")]
    EscapesRoot,
}

impl PathError {
    /// Machine-readable rejection reason for diagnostics.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::AbsolutePathRejected => "absolute_path",
            Self::UncPathRejected => "unc_path",
            Self::TraversalDetected => "traversal",
            Self::EscapesRoot => "escapes_root",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_generic_for_every_variant() {
        for err in [
            PathError::AbsolutePathRejected,
            PathError::UncPathRejected,
            PathError::TraversalDetected,
            PathError::EscapesRoot,
        ] {
            assert_eq!(err.to_string(), "invalid path");
        }
    }

    #[test]
    fn test_reason_distinguishes_variants() {
        assert_eq!(PathError::UncPathRejected.reason(), "unc_path");
        assert_eq!(PathError::EscapesRoot.reason(), "escapes_root");
    }
}
