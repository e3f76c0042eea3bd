//! Configuration handling for the TUI

use crate::api::DEFAULT_ADDRESS;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the API address
pub const ADDRESS_ENV: &str = "FAMILY_API_ADDRESS";

/// Country whose provinces fill the province list
const DEFAULT_COUNTRY_ID: i64 = 102;
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_TOAST_DURATION_MS: u64 = 2000;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Base address of the family API
    pub api_address: Option<String>,
    /// Country used to filter the province list
    pub country_id: Option<i64>,
    /// Families per page in the list view
    pub page_size: Option<u32>,
    /// How long success notifications stay visible
    pub toast_duration_ms: Option<u64>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "gereja", "family-tui")
    }

    /// Directory for log files
    pub fn log_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// API address: environment first, then file, then the default
    pub fn api_address(&self) -> String {
        self.api_address_with_env(std::env::var(ADDRESS_ENV).ok())
    }

    fn api_address_with_env(&self, env: Option<String>) -> String {
        env.filter(|a| !a.trim().is_empty())
            .or_else(|| self.api_address.clone())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
    }

    pub fn country_id(&self) -> i64 {
        self.country_id.unwrap_or(DEFAULT_COUNTRY_ID)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms.unwrap_or(DEFAULT_TOAST_DURATION_MS))
    }
}
