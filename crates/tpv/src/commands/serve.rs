//! `tpv serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use tpv_config::{CliSettings, Config};
use tpv_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tpv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long, env = "TPV_TEMPLATES_DIR")]
    templates: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            templates_dir: self.templates,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Preview server on http://{}:{}/",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Templates directory: {}",
            config.templates_resolved.dir.display()
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file: {}", path.display()));
        }

        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
