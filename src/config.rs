//! Runtime settings resolved from the environment.
//!
//! Binaries start from `Config::from_env()` and then apply their own flags on
//! top, so every entry point agrees on defaults.

use crate::query::DEFAULT_PAGE_SIZE;
use crate::source::DatasetSource;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DATASET_ENV: &str = "ITEMDEX_DATASET";
pub const STATE_DIR_ENV: &str = "ITEMDEX_STATE_DIR";
pub const PAGE_SIZE_ENV: &str = "ITEMDEX_PAGE_SIZE";
pub const FETCH_TIMEOUT_ENV: &str = "ITEMDEX_FETCH_TIMEOUT_SECS";

const DEFAULT_DATASET: &str = "items.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset: DatasetSource,
    pub state_dir: PathBuf,
    pub page_size: usize,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dataset = value(DATASET_ENV)
            .map(|raw| DatasetSource::parse(&raw))
            .unwrap_or_else(|| DatasetSource::File(PathBuf::from(DEFAULT_DATASET)));
        let state_dir = value(STATE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);
        let page_size = value(PAGE_SIZE_ENV)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let fetch_timeout = value(FETCH_TIMEOUT_ENV)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));

        Self {
            dataset,
            state_dir,
            page_size,
            fetch_timeout,
        }
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("itemdex"))
        .unwrap_or_else(|| PathBuf::from(".itemdex"))
}
