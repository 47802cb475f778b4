//! Configuration loading for the Formdesk TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use formdesk_core::{Operator, RowsPerPage};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
    pub banner_ttl_ms: u64,
    pub default_rows_per_page: usize,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub operator: Operator,
    pub auth: AuthConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or FORMDESK_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if !(1_000..=60_000).contains(&self.banner_ttl_ms) {
            return Err(ConfigError::InvalidValue {
                field: "banner_ttl_ms",
                reason: "must be between 1000 and 60000".to_string(),
            });
        }
        if RowsPerPage::try_from(self.default_rows_per_page).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "default_rows_per_page",
                reason: "must be 5, 10 or 20".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.operator.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "operator.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.to_ascii_lowercase() != "ledger" {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'ledger' is supported".to_string(),
            });
        }
        Ok(())
    }

    pub fn rows_per_page(&self) -> RowsPerPage {
        RowsPerPage::try_from(self.default_rows_per_page).unwrap_or_default()
    }

    pub fn banner_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.banner_ttl_ms as i64)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("FORMDESK_TUI_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
