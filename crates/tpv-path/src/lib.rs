//! Sandboxed resolution of untrusted template paths.
//!
//! [`resolve`] turns a caller-supplied relative path into an absolute path
//! that is guaranteed to lie inside a root directory, or rejects it. The
//! work is split into small stages that each do one thing:
//!
//! ```text
//! reject absolute/UNC ─► decode (≤5 rounds) ─► null-byte check ─► sanitize
//!     ─► separators ─► traversal check ─► clean ─► traversal check ─► contain
//! ```
//!
//! Every stage is pure. The resolver never touches the filesystem apart
//! from reading the current directory when `root` is relative.

mod clean;
mod decode;
mod error;
mod sanitize;
mod traversal;

use std::path::{Component, Path, PathBuf};

pub use clean::clean_path;
pub use error::PathError;

use decode::decode_layers;
use sanitize::sanitize;
use traversal::contains_traversal;

/// Resolve `requested` against `root`.
///
/// Returns the absolute path on success. The result is always `root` itself
/// or a descendant of it. Any `..` in the decoded request is rejected, even
/// when it would stay inside the root after cleaning.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tpv_path::resolve;
///
/// let root = Path::new("/base");
/// assert_eq!(resolve(root, "sub/file.html").unwrap(), PathBuf::from("/base/sub/file.html"));
/// assert_eq!(resolve(root, "").unwrap(), PathBuf::from("/base"));
/// assert!(resolve(root, "%2e%2e%2f").is_err());
/// ```
pub fn resolve(root: &Path, requested: &str) -> Result<PathBuf, PathError> {
    resolve_stages(root, requested).inspect_err(|err| {
        tracing::debug!(reason = err.reason(), "Rejected requested path");
    })
}

fn resolve_stages(root: &Path, requested: &str) -> Result<PathBuf, PathError> {
    reject_absolute(requested)?;

    let decoded = decode_layers(requested);
    if decoded.contains(&0) {
        return Err(PathError::TraversalDetected);
    }

    let relative = normalize_separators(&sanitize(&decoded));
    reject_traversal(&relative)?;

    let cleaned = clean_path(&relative);
    reject_traversal(&cleaned)?;

    ensure_contained(root, &cleaned)
}

/// Reject rooted, drive-letter and UNC paths before any decoding.
fn reject_absolute(requested: &str) -> Result<(), PathError> {
    if requested.starts_with("\\\\") || requested.starts_with("//") {
        return Err(PathError::UncPathRejected);
    }
    if requested.starts_with('/') || requested.as_bytes().get(1) == Some(&b':') {
        return Err(PathError::AbsolutePathRejected);
    }
    Ok(())
}

/// Use forward slashes only and drop leading separators.
fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_owned()
}

fn reject_traversal(path: &str) -> Result<(), PathError> {
    if contains_traversal(path) {
        Err(PathError::TraversalDetected)
    } else {
        Ok(())
    }
}

/// Join the cleaned relative path onto the root and prove containment.
fn ensure_contained(root: &Path, cleaned: &str) -> Result<PathBuf, PathError> {
    let root = std::path::absolute(root)
        .map(|p| normalize_lexically(&p))
        .map_err(|_| PathError::EscapesRoot)?;

    if cleaned == "." {
        return Ok(root);
    }

    let full = normalize_lexically(&root.join(cleaned));
    if full.starts_with(&root) {
        Ok(full)
    } else {
        Err(PathError::EscapesRoot)
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROOT: &str = "/base";

    fn ok(requested: &str) -> PathBuf {
        resolve(Path::new(ROOT), requested)
            .unwrap_or_else(|e| panic!("expected {requested:?} to resolve, got {e:?}"))
    }

    fn rejected(requested: &str) -> PathError {
        match resolve(Path::new(ROOT), requested) {
            Ok(path) => panic!("expected {requested:?} to be rejected, got {}", path.display()),
            Err(e) => e,
        }
    }

    #[test]
    fn test_valid_paths() {
        assert_eq!(ok("sub/dir/file.html"), PathBuf::from("/base/sub/dir/file.html"));
        assert_eq!(ok("test.html"), PathBuf::from("/base/test.html"));
        assert_eq!(ok("./test.html"), PathBuf::from("/base/test.html"));
        assert_eq!(ok("dir//file.html"), PathBuf::from("/base/dir/file.html"));
        assert_eq!(ok("dir/././file.html"), PathBuf::from("/base/dir/file.html"));
        assert_eq!(ok("dir/"), PathBuf::from("/base/dir"));
    }

    #[test]
    fn test_root_itself() {
        assert_eq!(ok(""), PathBuf::from("/base"));
        assert_eq!(ok("."), PathBuf::from("/base"));
        assert_eq!(ok("./"), PathBuf::from("/base"));
    }

    #[test]
    fn test_base64_looking_name_is_a_filename() {
        assert_eq!(ok("Li4v"), PathBuf::from("/base/Li4v"));
    }

    #[test]
    fn test_percent_encoded_name_is_decoded() {
        assert_eq!(ok("my%20template.html"), PathBuf::from("/base/my template.html"));
    }

    #[test]
    fn test_absolute_paths() {
        assert_eq!(rejected("/etc/passwd"), PathError::AbsolutePathRejected);
        assert_eq!(rejected("/test.html"), PathError::AbsolutePathRejected);
        assert_eq!(rejected("/."), PathError::AbsolutePathRejected);
        assert_eq!(rejected("C:\\Windows\\System32"), PathError::AbsolutePathRejected);
        assert_eq!(rejected("c:/windows/system32"), PathError::AbsolutePathRejected);
    }

    #[test]
    fn test_unc_paths() {
        assert_eq!(rejected("\\\\server\\share\\file"), PathError::UncPathRejected);
        assert_eq!(rejected("\\\\.\\C:\\windows"), PathError::UncPathRejected);
        assert_eq!(rejected("///"), PathError::UncPathRejected);
        assert_eq!(rejected("\\\\\\"), PathError::UncPathRejected);
        assert_eq!(rejected("//../etc/passwd"), PathError::UncPathRejected);
    }

    #[test]
    fn test_plain_traversal() {
        for path in [
            "..",
            "../",
            "...",
            "../etc/passwd",
            "../../../../../../../etc/passwd",
            "subdir/../../../etc/passwd",
            "a/b/../c/file.html",
            "dir/../file.html",
            "..\\..\\windows\\system32\\config\\sam",
            "../\\../etc/passwd",
            "\\..\\etc\\passwd",
            "templates\\phishing\\..\\..\\windows",
        ] {
            assert_eq!(rejected(path), PathError::TraversalDetected, "{path:?}");
        }
        assert_eq!(rejected(&"../".repeat(100)), PathError::TraversalDetected);
    }

    #[test]
    fn test_encoded_traversal() {
        for path in [
            "%2e%2e/",
            "%2e%2e%2f",
            "%2e%2e%5c",
            "..%2f",
            "%2e.%2f",
            "%252e%252e/",
            "%252e%252e%252f",
            "%25252e%25252e%25252f",
            "&#46;&#46;/",
            "&#46;&#46;&#47;",
            "&#x2e;&#x2e;&#x2f;",
            "%c0%ae%c0%ae/",
            "%c0%ae%c0%ae%c0%af",
            "..\u{2215}etc\u{2215}passwd",
            "..\u{2044}etc\u{2044}passwd",
            "\u{FF0E}\u{FF0E}\u{FF0F}etc",
        ] {
            assert_eq!(rejected(path), PathError::TraversalDetected, "{path:?}");
        }
    }

    #[test]
    fn test_deeply_nested_encoding_hits_backstop() {
        // Six encoding layers leave a literal `%2e%2e` after five rounds.
        assert_eq!(
            rejected("%25252525252e%25252525252e/"),
            PathError::TraversalDetected
        );
    }

    #[test]
    fn test_whitespace_and_control_variants() {
        for path in [
            ". ./",
            ".\t./",
            " ../",
            "../ ",
            "..\r/etc/passwd",
            "..\n/etc/passwd",
            "..\u{b}/etc/passwd",
            "..\u{c}/etc/passwd",
        ] {
            assert_eq!(rejected(path), PathError::TraversalDetected, "{path:?}");
        }
    }

    #[test]
    fn test_null_bytes() {
        assert_eq!(rejected("../\0etc/passwd"), PathError::TraversalDetected);
        assert_eq!(rejected("file.html\0.png"), PathError::TraversalDetected);
        assert_eq!(rejected("file.html%00.png"), PathError::TraversalDetected);
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let resolved = resolve(Path::new("relative/root"), "file.html").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative/root/file.html"));
    }

    #[test]
    fn test_containment_over_fragment_combinations() {
        const FRAGMENTS: &[&str] = &[
            "..", ".", "/", "\\", "a", "etc", " ", "\t", "%2e", "%2f", "%5c", "%252e",
            "&#46;", "&#x2f;", "%c0%ae", "%c0%af", "\u{2215}", "\u{FF0E}", "%00", "C:",
        ];

        let root = Path::new(ROOT);
        let mut checked = 0;
        for a in FRAGMENTS {
            for b in FRAGMENTS {
                for c in FRAGMENTS {
                    let candidate = format!("{a}{b}{c}");
                    if let Ok(path) = resolve(root, &candidate) {
                        assert!(
                            path == root || path.starts_with(root),
                            "{candidate:?} escaped to {}",
                            path.display()
                        );
                        assert!(
                            !path.to_string_lossy().contains(".."),
                            "{candidate:?} kept a parent reference"
                        );
                    }
                    checked += 1;
                }
            }
        }
        assert_eq!(checked, FRAGMENTS.len().pow(3));
    }
}
