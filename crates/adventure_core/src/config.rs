//! Application configuration.
//!
//! # Responsibility
//! - Load tunables from an optional TOML file.
//! - Provide defaults for every field so an absent file is a valid setup.
//!
//! # Invariants
//! - A returned `AppConfig` has passed `validate()`.

use crate::logging::default_log_level;
use crate::model::predicate::UnfilteredPolicy;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_VISIBLE_CHIPS: usize = 20;
const DEFAULT_RADIUS_OPTIONS_MILES: [u32; 7] = [5, 10, 20, 30, 50, 100, 200];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chips: ChipConfig,
    #[serde(default)]
    pub radius: RadiusConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipConfig {
    /// Chips shown before the list is expanded.
    #[serde(default = "default_visible_limit")]
    pub visible_limit: usize,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            visible_limit: default_visible_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusConfig {
    /// Selectable "near me" radii in miles.
    #[serde(default = "default_radius_options")]
    pub options_miles: Vec<u32>,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            options_miles: default_radius_options(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub unfiltered: UnfilteredPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files. File logging is off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_visible_limit() -> usize {
    DEFAULT_VISIBLE_CHIPS
}

fn default_radius_options() -> Vec<u32> {
    DEFAULT_RADIUS_OPTIONS_MILES.to_vec()
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl AppConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chips.visible_limit == 0 {
            return Err(ConfigError::Invalid(
                "chips.visible_limit must be greater than 0".to_string(),
            ));
        }
        if self.radius.options_miles.is_empty() {
            return Err(ConfigError::Invalid(
                "radius.options_miles must not be empty".to_string(),
            ));
        }
        if self.radius.options_miles.contains(&0) {
            return Err(ConfigError::Invalid(
                "radius.options_miles must not contain 0".to_string(),
            ));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Whether `miles` is one of the configured radius options.
    pub fn is_radius_option(&self, miles: u32) -> bool {
        self.radius.options_miles.contains(&miles)
    }
}

/// Loads configuration from `path`, falling back to defaults when it is absent.
///
/// # Errors
/// - `Read` when the file exists but cannot be read.
/// - `Parse` when the TOML is malformed or has wrongly typed fields.
/// - `Invalid` when values are out of range.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        info!(
            "event=config_load module=config status=default path={}",
            path.display()
        );
        return Ok(AppConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AppConfig::from_toml_str(&text)?;
    info!(
        "event=config_load module=config status=ok path={}",
        path.display()
    );
    Ok(config)
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::model::predicate::UnfilteredPolicy;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chips.visible_limit, 20);
        assert!(config.is_radius_option(50));
        assert!(!config.is_radius_option(7));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            "[catalog]\nunfiltered = \"return_none\"\n[chips]\nvisible_limit = 5\n",
        )
        .expect("valid config");
        assert_eq!(config.catalog.unfiltered, UnfilteredPolicy::ReturnNone);
        assert_eq!(config.chips.visible_limit, 5);
        assert_eq!(config.radius.options_miles.len(), 7);
    }

    #[test]
    fn rejects_zero_radius_and_relative_log_dir() {
        let err = AppConfig::from_toml_str("[radius]\noptions_miles = [0, 5]\n")
            .expect_err("zero radius must be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml_str("[logging]\ndir = \"logs\"\n")
            .expect_err("relative log dir must be rejected");
        assert!(err.to_string().contains("absolute"));
    }
}
