//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
//! 3. Local config: explicit `--config` file, else `./.coursecat.toml` if present
//! 4. Environment variables: `COURSECAT_*` prefix
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// File name of the optional per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".coursecat.toml";

/// Unified configuration for coursecat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Catalog source loaded by menu option 1 (default: courses.csv)
    pub source_path: PathBuf,
    /// Field separator of the catalog source
    pub delimiter: char,
    /// Start sessions with tree diagnostics enabled
    pub diagnostics: bool,
    /// Regex the normalized course id must match, e.g. `^[A-Z]{4}\d{3}$`
    pub id_pattern: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("courses.csv"),
            delimiter: ',',
            diagnostics: false,
            id_pattern: None,
        }
    }
}

/// Get the XDG config directory for coursecat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursecat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursecat.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit config file; it must exist. Without it,
    ///   `./.coursecat.toml` is read when present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local, Some("COURSECAT"))
    }

    /// Layered load with every source spelled out, used by [`Settings::load`]
    /// and by tests that must not see the user's real config.
    ///
    /// # Arguments
    /// * `global` - Global config file, skipped when missing
    /// * `local` - Local config file, required when given
    /// * `env_prefix` - Prefix for environment overrides, `None` to skip them
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        env_prefix: Option<&str>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "source_path",
                defaults.source_path.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .set_default("delimiter", defaults.delimiter.to_string())
            .map_err(config_err)?
            .set_default("diagnostics", defaults.diagnostics)
            .map_err(config_err)?;

        // 2. Global config
        if let Some(global_path) = global {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // 3. Local config
        match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                let cwd_config = Path::new(LOCAL_CONFIG_FILE);
                if cwd_config.exists() {
                    builder = builder.add_source(File::from(cwd_config).format(FileFormat::Toml));
                }
            }
        }

        // 4. Environment variables (replace)
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix));
        }

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in `source_path`.
    fn expand_paths(&mut self) {
        let raw = self.source_path.to_string_lossy().to_string();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.source_path = PathBuf::from(expanded.as_ref());
        }
    }

    /// Render settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
