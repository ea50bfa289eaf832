//! Runtime configuration, read from the environment.

use crate::error::{InvalidConfigSnafu, Result};
use news_nexus::BaseUrl;
use snafu::prelude::*;
use std::path::PathBuf;

pub const BASE_URL: &str = "BASE_URL";
pub const NEWS_DATA: &str = "NEWS_DATA";
pub const NEWS_USER_ID: &str = "NEWS_USER_ID";
pub const NEWS_START: &str = "NEWS_START";
pub const NEWS_LOG_DIR: &str = "NEWS_LOG_DIR";
pub const NEWS_LOG: &str = "NEWS_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix every history entry lives under.
    pub base_url: BaseUrl,
    /// JSON feed to read; the bundled sample when `None`.
    pub data: Option<PathBuf>,
    /// User shown on the profile page.
    pub user_id: i64,
    /// Href opened at start-up.
    pub start: String,
    pub log_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            data: None,
            user_id: 1,
            start: "/".to_owned(),
            log_dir: PathBuf::from("logs"),
            log_filter: "info".to_owned(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let user_id = match get(NEWS_USER_ID) {
            Some(raw) => raw
                .parse()
                .ok()
                .context(InvalidConfigSnafu { key: NEWS_USER_ID, value: raw.as_str() })?,
            None => defaults.user_id,
        };

        let start = get(NEWS_START).unwrap_or(defaults.start);
        ensure!(
            start.starts_with('/'),
            InvalidConfigSnafu { key: NEWS_START, value: start.as_str() }
        );

        Ok(Self {
            base_url: get(BASE_URL).map_or(defaults.base_url, |raw| BaseUrl::new(&raw)),
            data: get(NEWS_DATA).map(PathBuf::from),
            user_id,
            start,
            log_dir: get(NEWS_LOG_DIR).map_or(defaults.log_dir, PathBuf::from),
            log_filter: get(NEWS_LOG).unwrap_or(defaults.log_filter),
        })
    }
}
