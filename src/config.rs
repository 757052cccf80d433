use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::StatusFilter;

pub const ENV_FILTER: &str = "TASKLIST_FILTER";
pub const ENV_LOG_LEVEL: &str = "TASKLIST_LOG";
pub const ENV_LOG_FILE: &str = "TASKLIST_LOG_FILE";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Session settings resolved from flags, then environment, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub initial_filter: StatusFilter,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_filter: StatusFilter::All,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn resolve(
        filter: Option<&str>,
        log_level: Option<&str>,
        log_file: Option<PathBuf>,
    ) -> Result<Self> {
        Self::resolve_with(filter, log_level, log_file, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::resolve`] with an injectable environment lookup.
    pub fn resolve_with<F>(
        filter: Option<&str>,
        log_level: Option<&str>,
        log_file: Option<PathBuf>,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let initial_filter = match filter.map(str::to_string).or_else(|| env(ENV_FILTER)) {
            Some(raw) => raw
                .parse::<StatusFilter>()
                .with_context(|| format!("invalid initial filter '{}'", raw))?,
            None => defaults.initial_filter,
        };

        let log_level = log_level
            .map(str::to_string)
            .or_else(|| env(ENV_LOG_LEVEL))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_level);

        let log_file = log_file.or_else(|| {
            env(ENV_LOG_FILE)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        });

        Ok(Config {
            initial_filter,
            log_level,
            log_file,
        })
    }
}
