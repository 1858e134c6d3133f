//! `tpv render` command implementation.
//!
//! Runs one template through the same resolve-and-render pipeline as the
//! server's `/raw` route and writes the result to stdout or a file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tpv_config::{CliSettings, Config};

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Template path, relative to the templates directory.
    path: String,

    /// Path to configuration file (default: auto-discover tpv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long, env = "TPV_TEMPLATES_DIR")]
    templates: Option<PathBuf>,

    /// Write the rendered page to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the path is rejected or
    /// missing, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            templates_dir: self.templates,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let rendered = render_template(&config.templates_resolved.dir, &self.path)?;

        if let Some(path) = &self.output {
            std::fs::write(path, &rendered)?;
        } else {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
        Ok(())
    }
}

/// Resolve `path` under `templates_dir` and render it.
fn render_template(templates_dir: &Path, path: &str) -> Result<Vec<u8>, CliError> {
    let root = std::fs::canonicalize(templates_dir).map_err(|e| {
        CliError::Validation(format!(
            "Templates directory {}: {e}",
            templates_dir.display()
        ))
    })?;

    let file = tpv_path::resolve(&root, path).map_err(|source| CliError::Path {
        path: path.to_owned(),
        source,
    })?;
    if file.is_dir() {
        return Err(CliError::Validation(format!("{path} is a directory")));
    }

    let raw = match std::fs::read(&file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CliError::Validation(format!("Template not found: {path}")));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(path, "Rendering template");
    Ok(tpv_render::render(&root, path, &raw))
}
