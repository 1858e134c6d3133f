//! Asset serving under the public `/templates` mount.
//!
//! A request is answered from the first existing file among:
//!
//! 1. `<root>/<path>`
//! 2. `<root>/assets/<parent>/<name>` (last two segments of the path)
//! 3. `<root>/assets/<name>`
//!
//! The fallbacks only apply to paths with at least two segments.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Response;
use tpv_path::clean_path;
use tpv_render::GLOBAL_ASSETS_DIR;

use crate::error::ServerError;
use crate::handlers;
use crate::state::AppState;

/// Handle GET /templates/{path}.
pub(crate) async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    for candidate in asset_candidates(&state.root, &path)? {
        let is_file = tokio::fs::metadata(&candidate)
            .await
            .is_ok_and(|metadata| metadata.is_file());
        if is_file {
            let content = tokio::fs::read(&candidate).await?;
            return Ok(handlers::file_response(&candidate, content));
        }
    }

    Err(ServerError::NotFound(path))
}

/// Files to try for `path`, in priority order. Every candidate is resolved
/// through the sandbox, so a rejected request yields no candidates at all.
fn asset_candidates(root: &FsPath, path: &str) -> Result<Vec<PathBuf>, ServerError> {
    let mut candidates = vec![tpv_path::resolve(root, path)?];

    let cleaned = clean_path(path);
    let segments: Vec<&str> = cleaned.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    if let [.., parent, name] = segments.as_slice() {
        candidates.push(tpv_path::resolve(root, &format!("{GLOBAL_ASSETS_DIR}/{parent}/{name}"))?);
        candidates.push(tpv_path::resolve(root, &format!("{GLOBAL_ASSETS_DIR}/{name}"))?);
    }

    Ok(candidates)
}
