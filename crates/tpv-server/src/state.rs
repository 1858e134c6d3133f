//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

/// Application state shared across handlers.
pub(crate) struct AppState {
    /// Canonical template root. Every served path resolves beneath it.
    pub root: PathBuf,
}
