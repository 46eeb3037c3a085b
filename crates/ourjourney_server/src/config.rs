//! Server configuration.
//!
//! # Responsibility
//! - Load `ourjourney.toml` with defaults for every section.
//! - Reject unknown keys so typos fail loudly.
//!
//! # Invariants
//! - A config that passed `validate()` has non-zero counts and horizons.

use ourjourney_core::schedule::{DEFAULT_FREE_EVENING_COUNT, DEFAULT_FREE_EVENING_HORIZON_DAYS};
use ourjourney_core::Party;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// SQLite journal file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub custody: CustodyConfig,
}

/// Logging settings. `serve` logs to stderr when `dir` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Custody query settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustodyConfig {
    /// Whose free evenings the API reports.
    #[serde(default = "default_side")]
    pub side: Party,
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Largest span `/api/custody/range` will answer.
    #[serde(default = "default_max_range_days")]
    pub max_range_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            db_path: default_db_path(),
            log: LogConfig::default(),
            custody: CustodyConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            side: default_side(),
            default_count: default_count(),
            horizon_days: default_horizon_days(),
            max_range_days: default_max_range_days(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("ourjourney.db")
}
fn default_log_level() -> String {
    ourjourney_core::default_log_level().as_str().to_string()
}
fn default_side() -> Party {
    Party::You
}
fn default_count() -> usize {
    DEFAULT_FREE_EVENING_COUNT
}
fn default_horizon_days() -> u32 {
    DEFAULT_FREE_EVENING_HORIZON_DAYS
}
fn default_max_range_days() -> u32 {
    366
}

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

impl ServerConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.custody.default_count == 0 {
            return Err(ConfigError::Invalid(
                "custody.default_count must be > 0".to_string(),
            ));
        }
        if self.custody.horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "custody.horizon_days must be > 0".to_string(),
            ));
        }
        if self.custody.max_range_days == 0 {
            return Err(ConfigError::Invalid(
                "custody.max_range_days must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use ourjourney_core::Party;

    #[test]
    fn empty_file_yields_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.custody.default_count, 5);
        assert_eq!(config.custody.horizon_days, 60);
        assert_eq!(config.custody.side, Party::You);
    }

    #[test]
    fn sections_override_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind = "0.0.0.0:8080"
            db_path = "/var/lib/ourjourney/journal.db"

            [log]
            level = "warn"
            dir = "/var/log/ourjourney"

            [custody]
            side = "mom"
            horizon_days = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.custody.side, Party::Mom);
        assert_eq!(config.custody.horizon_days, 30);
        assert_eq!(config.custody.default_count, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<ServerConfig>("[custody]\nhorizon = 10\n").unwrap_err();
        assert!(err.to_string().contains("horizon"), "{err}");
    }

    #[test]
    fn zero_horizon_fails_validation() {
        let config: ServerConfig = toml::from_str("[custody]\nhorizon_days = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ServerConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
        assert_eq!(
            ServerConfig::load_or_default(&missing).unwrap(),
            ServerConfig::default()
        );
    }
}
