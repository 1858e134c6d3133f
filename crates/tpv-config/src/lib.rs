//! Configuration for the template preview server.
//!
//! Parses `tpv.toml` with serde, discovering it in the current directory or
//! its parents when no path is given. CLI flags override file values via
//! [`CliSettings`].
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [templates]
//! dir = "phishing-templates"
//! ```
//!
//! `server.host` and `templates.dir` support `${VAR}` and `${VAR:-default}`
//! environment variable expansion.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tpv.toml";

/// Template directory used when none is configured.
const DEFAULT_TEMPLATES_DIR: &str = "phishing-templates";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub templates_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Template settings as written in the file.
    templates: TemplatesConfigRaw,

    /// Templates settings with the directory resolved (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Path to the config file, if one was loaded.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// HTTP listener settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    dir: Option<String>,
}

/// Resolved template settings.
#[derive(Debug, Default)]
pub struct TemplatesConfig {
    /// Root directory all template paths are resolved against.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable expansion failed.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path, e.g. `templates.dir`.
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply CLI overrides.
    ///
    /// An explicit `config_path` must exist. Without one, `tpv.toml` is
    /// searched for upwards from the current directory; if none is found,
    /// defaults relative to the current directory are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, unreadable, invalid
    /// TOML, references an unset variable, or fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(dir) = &settings.templates_dir {
            self.templates_resolved.dir.clone_from(dir);
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            templates: TemplatesConfigRaw::default(),
            templates_resolved: TemplatesConfig {
                dir: base.join(DEFAULT_TEMPLATES_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Check that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".to_owned()));
        }
        if self.templates_resolved.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("templates.dir cannot be empty".to_owned()));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(dir) = &self.templates.dir {
            self.templates.dir = Some(expand::expand_env(dir, "templates.dir")?);
        }
        Ok(())
    }

    /// Resolve the template directory relative to the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let dir = match self.templates.dir.as_deref() {
            Some("") => PathBuf::new(),
            Some(dir) => config_dir.join(dir),
            None => config_dir.join(DEFAULT_TEMPLATES_DIR),
        };
        self.templates_resolved = TemplatesConfig { dir };
    }
}
