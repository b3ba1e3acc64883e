//! `AppConfig` struct and TOML read/write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clarotv_api::epg::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_TIMEZONE, parse_timezone};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// EPG service settings.
    #[serde(default)]
    pub epg: EpgConfig,
    /// Location dataset settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Date/time interpretation settings.
    #[serde(default)]
    pub time: TimeConfig,
}

/// EPG service endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpgConfig {
    /// `livechannels` endpoint.
    pub base_url: String,
    /// Channel logo host.
    pub image_base_url: String,
}

impl Default for EpgConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            image_base_url: String::from(DEFAULT_IMAGE_BASE_URL),
        }
    }
}

/// Location dataset files. Relative paths resolve against the working directory.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// States dataset (JSON array of `{name, ...}`).
    pub states_path: PathBuf,
    /// Cities dataset (JSON array of `{name, UF-nome, ...}`).
    pub cities_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            states_path: PathBuf::from("data/states.json"),
            cities_path: PathBuf::from("data/cities.json"),
        }
    }
}

/// Timezone settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeConfig {
    /// IANA zone used to interpret entered dates and times.
    pub timezone: String,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            timezone: String::from(DEFAULT_TIMEZONE),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Parses the configured EPG endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `epg.base_url` is not a valid URL.
    pub fn epg_base_url(&self) -> Result<Url> {
        Url::parse(&self.epg.base_url)
            .with_context(|| format!("invalid epg.base_url: {}", self.epg.base_url))
    }

    /// Resolves the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if `time.timezone` is not an IANA zone.
    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.time.timezone).context("invalid time.timezone")
    }
}
