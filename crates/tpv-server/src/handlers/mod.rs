//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod original;
pub(crate) mod raw;

use std::fs::Metadata;
use std::io;
use std::path::Path;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;

pub(crate) const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub(crate) const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Extensions rendered through the template pipeline.
const TEMPLATE_EXTENSIONS: [&str; 2] = ["html", "yaml"];

/// Whether the file at `path` is rendered rather than served as-is.
pub(crate) fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
}

/// Stat `path`, reporting a missing entry as `NotFound` for `request`.
pub(crate) async fn metadata(path: &Path, request: &str) -> Result<Metadata, ServerError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(metadata),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Err(ServerError::NotFound(request.to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Response for a file served unchanged, typed by its extension.
pub(crate) fn file_response(path: &Path, content: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.to_string())], content).into_response()
}
