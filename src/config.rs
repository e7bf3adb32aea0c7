//! Configuration loading and management
//!
//! Handles parsing of `studyplan.toml` from the data directory and
//! resolution of the data directory itself.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::WELL_KNOWN_LISTS;

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "studyplan.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User configuration
    #[serde(default)]
    pub user: UserConfig,

    /// List configuration
    #[serde(default)]
    pub lists: ListsConfig,

    /// Calendar configuration
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: UserConfig::default(),
            lists: ListsConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

/// User-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Default user when none is passed on the command line
    #[serde(default)]
    pub default: Option<String>,
}

/// Task list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListsConfig {
    /// List labels offered by the product
    #[serde(default = "default_known_lists")]
    pub known: Vec<String>,
}

fn default_known_lists() -> Vec<String> {
    WELL_KNOWN_LISTS.iter().map(|s| s.to_string()).collect()
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            known: default_known_lists(),
        }
    }
}

/// Calendar-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First hour of the day view's business window (0-23)
    #[serde(default = "default_business_start")]
    pub business_start: u32,

    /// Last hour of the day view's business window (0-23, inclusive)
    #[serde(default = "default_business_end")]
    pub business_end: u32,
}

fn default_business_start() -> u32 {
    *crate::date::BUSINESS_HOURS.start()
}

fn default_business_end() -> u32 {
    *crate::date::BUSINESS_HOURS.end()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            business_start: default_business_start(),
            business_end: default_business_end(),
        }
    }
}

impl CalendarConfig {
    /// The configured business-hours window, inclusive
    pub fn business_hours(&self) -> std::ops::RangeInclusive<u32> {
        self.business_start..=self.business_end
    }
}

impl Config {
    /// Load configuration from `studyplan.toml` in the data directory,
    /// falling back to defaults when the file is absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_file(&data_dir.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file path; an absent file
    /// yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to `studyplan.toml` in the data directory
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.lists.known.is_empty() {
            return Err(Error::InvalidConfig(
                "lists.known must not be empty".to_string(),
            ));
        }
        if let Some(user) = &self.user.default {
            if user.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "user.default must not be blank".to_string(),
                ));
            }
        }
        if self.calendar.business_end > 23 {
            return Err(Error::InvalidConfig(
                "calendar.business_end must be at most 23".to_string(),
            ));
        }
        if self.calendar.business_start > self.calendar.business_end {
            return Err(Error::InvalidConfig(
                "calendar.business_start must not be after business_end".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the data directory: explicit flag first, then the platform's
/// per-user data dir.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    ProjectDirs::from("", "", "studyplan")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::InvalidConfig("could not determine a data directory; pass --data-dir".to_string())
        })
}
