//! HTTP server for previewing campaign templates.
//!
//! Serves a template directory with axum:
//! - `/raw/{path}` renders `.html`/`.yaml` templates with sample data
//! - `/original/{path}` returns template source unchanged
//! - `/templates/{path}` serves assets, falling back to the shared pool
//!
//! Every request path goes through [`tpv_path::resolve`] before the
//! filesystem is touched.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tpv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8080,
//!         templates_dir: PathBuf::from("phishing-templates"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Template root directory. Created if missing.
    pub templates_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            templates_dir: PathBuf::from("phishing-templates"),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the template root cannot be prepared or the server
/// fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let root = prepare_root(&config.templates_dir).await?;
    tracing::info!(root = %root.display(), "Serving templates");

    let state = Arc::new(AppState { root });
    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the template root if needed and return its canonical path.
async fn prepare_root(dir: &Path) -> std::io::Result<PathBuf> {
    if !tokio::fs::try_exists(dir).await? {
        tracing::info!(path = %dir.display(), "Creating templates directory");
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::canonicalize(dir).await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded configuration file.
#[must_use]
pub fn server_config_from_config(config: &tpv_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        templates_dir: config.templates_resolved.dir.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_prepare_root_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("nested/templates");

        let root = prepare_root(&templates).await.unwrap();

        assert!(root.is_dir());
        assert!(root.is_absolute());
        assert_eq!(root, templates.canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_prepare_root_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("t")).unwrap();

        let root = prepare_root(&dir.path().join("t/../t")).await.unwrap();
        assert_eq!(root, dir.path().join("t").canonicalize().unwrap());
    }

    #[test]
    fn test_server_config_from_config() {
        let mut config = tpv_config::Config::default();
        config.server.port = 9000;
        config.templates_resolved.dir = PathBuf::from("/srv/campaigns");

        let server = server_config_from_config(&config);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9000);
        assert_eq!(server.templates_dir, PathBuf::from("/srv/campaigns"));
    }
}
