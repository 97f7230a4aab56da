//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cygport-helper/config.toml`
//! 3. Project config: `<working_dir>/.cygport-helper.toml`
//! 4. Environment variables: `CYGPORT_HELPER_*` prefix
//! 5. `CYGPORT_COMMAND` for the delegate path

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, LogWrapper};

/// Environment variable naming the delegate cygport executable.
pub const DELEGATE_ENV: &str = "CYGPORT_COMMAND";

/// Delegate used when nothing else is configured.
pub const DEFAULT_DELEGATE: &str = "/usr/bin/cygport";

/// Prefix for environment overrides of any setting.
pub const ENV_PREFIX: &str = "CYGPORT_HELPER";

/// Logging wrapper configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogWrapperConfig {
    /// Wrapper executable
    pub program: String,
    /// Flag asking the wrapper to timestamp lines
    pub timestamp_flag: String,
    /// Flag preceding the log file path
    pub log_file_flag: String,
    /// Directory for per-step log files, relative to the working directory
    pub log_dir: String,
}

impl Default for LogWrapperConfig {
    fn default() -> Self {
        Self {
            program: "logts".into(),
            timestamp_flag: "-t".into(),
            log_file_flag: "-b".into(),
            log_dir: "log".into(),
        }
    }
}

impl LogWrapperConfig {
    pub fn to_wrapper(&self) -> LogWrapper {
        LogWrapper {
            program: self.program.clone(),
            timestamp_flag: self.timestamp_flag.clone(),
            log_file_flag: self.log_file_flag.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Raw log wrapper config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLogWrapperConfig {
    pub program: Option<String>,
    pub timestamp_flag: Option<String>,
    pub log_file_flag: Option<String>,
    pub log_dir: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub delegate: Option<String>,
    pub package_suffix: Option<String>,
    #[serde(default)]
    pub log_wrapper: RawLogWrapperConfig,
}

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The real cygport executable
    pub delegate: String,
    /// Package-file extension searched for when `<cygport-file>` is `.`
    pub package_suffix: String,
    /// Wrapper used by `--log`
    pub log_wrapper: LogWrapperConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delegate: DEFAULT_DELEGATE.into(),
            package_suffix: "cygport".into(),
            log_wrapper: LogWrapperConfig::default(),
        }
    }
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cygport-helper").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the project config file in a working directory.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(".cygport-helper.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in program paths.
    fn expand_paths(&mut self) {
        self.delegate = expand_env_vars(&self.delegate);
        self.log_wrapper.program = expand_env_vars(&self.log_wrapper.program);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let base = &self.log_wrapper;
        let raw = &overlay.log_wrapper;
        Self {
            delegate: overlay
                .delegate
                .clone()
                .unwrap_or_else(|| self.delegate.clone()),
            package_suffix: overlay
                .package_suffix
                .clone()
                .unwrap_or_else(|| self.package_suffix.clone()),
            log_wrapper: LogWrapperConfig {
                program: raw.program.clone().unwrap_or_else(|| base.program.clone()),
                timestamp_flag: raw
                    .timestamp_flag
                    .clone()
                    .unwrap_or_else(|| base.timestamp_flag.clone()),
                log_file_flag: raw
                    .log_file_flag
                    .clone()
                    .unwrap_or_else(|| base.log_file_flag.clone()),
                log_dir: raw.log_dir.clone().unwrap_or_else(|| base.log_dir.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `working_dir` - Optional directory holding a project config file
    pub fn load(working_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = working_dir {
            let local_path = project_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        if let Ok(delegate) = std::env::var(DELEGATE_ENV) {
            if !delegate.is_empty() {
                current.delegate = delegate;
            }
        }

        current.expand_paths();

        Ok(current)
    }

    /// Apply `CYGPORT_HELPER_*` environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `CYGPORT_HELPER_LOG_WRAPPER__PROGRAM`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("delegate") {
            settings.delegate = val;
        }
        if let Ok(val) = config.get_string("package_suffix") {
            settings.package_suffix = val;
        }
        if let Ok(val) = config.get_string("log_wrapper.program") {
            settings.log_wrapper.program = val;
        }
        if let Ok(val) = config.get_string("log_wrapper.timestamp_flag") {
            settings.log_wrapper.timestamp_flag = val;
        }
        if let Ok(val) = config.get_string("log_wrapper.log_file_flag") {
            settings.log_wrapper.log_file_flag = val;
        }
        if let Ok(val) = config.get_string("log_wrapper.log_dir") {
            settings.log_wrapper.log_dir = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
