//! Lexical path cleaning.

/// Clean a slash-separated path lexically, the way POSIX `path.Clean` does.
///
/// Collapses repeated separators, drops `.` segments, and resolves `..`
/// against preceding segments. A rooted `..` at the root is dropped. An empty
/// result becomes `.` (or `/` when rooted). Never touches the filesystem.
///
/// # Examples
///
/// ```
/// use tpv_path::clean_path;
///
/// assert_eq!(clean_path("a//b/./c/"), "a/b/c");
/// assert_eq!(clean_path("/templates/a/../b"), "/templates/b");
/// assert_eq!(clean_path(""), ".");
/// ```
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}
