use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_CITY: &str = "Pittsburgh";
pub const DEFAULT_HISTORY_PATH: &str = "weather.pkl";
pub const DEFAULT_REPORT_PATH: &str = "README.md";

/// Outbound HTTP settings shared by the geocoder and the weather API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Both Nominatim and api.weather.gov reject requests without one.
    pub user_agent: String,
    pub timeout_secs: u64,
    pub geocoder_url: String,
    pub weather_api_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "get-forecast".to_string(),
            timeout_secs: 30,
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            weather_api_url: "https://api.weather.gov".to_string(),
        }
    }
}

/// Fixed decorations around the rendered history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub badges: Vec<String>,
    pub footer: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            badges: vec![
                "![Status](https://github.com/khionech/python-get-forecast/actions/workflows/build.yml/badge.svg)".to_string(),
                "![Status](https://github.com/khionech/python-get-forecast/actions/workflows/pretty.yml/badge.svg)".to_string(),
            ],
            footer: "Copyright © 2022 Pittsburgh Supercomputing Center. All Rights Reserved."
                .to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "Pittsburgh"
/// history_path = "weather.pkl"
///
/// [http]
/// user_agent = "get-forecast"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub city: String,
    pub history_path: PathBuf,
    pub report_path: PathBuf,
    pub http: HttpConfig,
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            http: HttpConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or return defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nightly-forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Title line of the report, e.g. `# Pittsburgh Nightly Forecast`.
    pub fn report_title(&self) -> String {
        format!("# {} Nightly Forecast", self.city)
    }
}
