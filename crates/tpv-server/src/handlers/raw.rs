//! Rendered template view.
//!
//! `GET /raw/{path}` resolves the path under the template root and, for
//! `.html` and `.yaml` files, returns the rendered preview. Other files are
//! served unchanged.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::ServerError;
use crate::handlers::{self, HTML_CONTENT_TYPE};
use crate::state::AppState;

/// Characters escaped when a decoded path is put back into a `Location` header.
const LOCATION_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Handle GET /raw/{path}.
pub(crate) async fn get_raw(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    let file = tpv_path::resolve(&state.root, &path)?;
    let metadata = handlers::metadata(&file, &path).await?;

    if metadata.is_dir() {
        let location = format!("/{}", utf8_percent_encode(&path, LOCATION_ESCAPE));
        return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
    }

    let content = tokio::fs::read(&file).await?;
    if !handlers::is_template(&file) {
        return Ok(handlers::file_response(&file, content));
    }

    tracing::debug!(path = %path, "Rendering template");
    let rendered =
        tokio::task::spawn_blocking(move || tpv_render::render(&state.root, &path, &content))
            .await?;

    Ok(([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], rendered).into_response())
}

/// Handle GET /raw/ with no template path.
#[allow(clippy::unused_async)]
pub(crate) async fn no_template() -> ServerError {
    ServerError::NoTemplate
}
