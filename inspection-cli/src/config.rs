//! Environment configuration for the inspection CLI.

use std::fmt;

use inspection_core::InspectorRole;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CONCURRENCY: usize = 4;

/// Settings read from the environment (and `.env`) at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Maximum number of reports scored at once.
    pub concurrency: usize,
    /// Inspector name used when `--inspector` is not given.
    pub inspector: Option<String>,
    /// Role used when `--role` is not given.
    pub role: InspectorRole,
}

impl CliConfig {
    /// Load `.env` if present, then read `INSPECTION_*` variables.
    #[cfg(not(test))]
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = non_empty(lookup("INSPECTION_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let concurrency = match non_empty(lookup("INSPECTION_CONCURRENCY")) {
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidConcurrency(value))?,
            None => DEFAULT_CONCURRENCY,
        };

        let inspector = non_empty(lookup("INSPECTION_INSPECTOR"));

        let role = match non_empty(lookup("INSPECTION_ROLE")) {
            Some(value) => {
                InspectorRole::from_name(&value).ok_or(ConfigError::InvalidRole(value))?
            }
            None => InspectorRole::Inspector,
        };

        Ok(Self {
            log_level,
            concurrency,
            inspector,
            role,
        })
    }
}

/// Invalid environment values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `INSPECTION_CONCURRENCY` is not a number.
    InvalidConcurrency(String),
    /// `INSPECTION_ROLE` is not a known role.
    InvalidRole(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConcurrency(value) => {
                write!(f, "INSPECTION_CONCURRENCY must be an integer, got '{value}'")
            }
            ConfigError::InvalidRole(value) => write!(
                f,
                "INSPECTION_ROLE must be inspector, admin or viewer, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
