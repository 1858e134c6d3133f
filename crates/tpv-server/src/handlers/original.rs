//! Unprocessed template source.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::{self, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE};
use crate::state::AppState;

/// Handle GET /original/{path}.
///
/// Returns the file bytes exactly as stored: `.html` files as HTML,
/// everything else as plain text.
pub(crate) async fn get_original(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    let file = tpv_path::resolve(&state.root, &path)?;
    let metadata = handlers::metadata(&file, &path).await?;

    if metadata.is_dir() {
        return Err(ServerError::IsDirectory(path));
    }

    let content = tokio::fs::read(&file).await?;
    let content_type = if file.extension().is_some_and(|ext| ext == "html") {
        HTML_CONTENT_TYPE
    } else {
        TEXT_CONTENT_TYPE
    };

    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}
