/// Run configuration.
///
/// Two layers, read in this order:
/// 1. An optional TOML file (`./sunshine.toml` unless `SUNSHINE_CONFIG`
///    names another) holding chart geometry, feature flags, fetch settings
///    and city overrides. Every key has a default, so an absent file
///    yields the stock three-city render.
/// 2. Environment variables (a `.env` file is honoured by the binary) for
///    the things that vary per machine: output directory and logging.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cities::{City, default_cities, merge_cities, select_cities};
use crate::logging::LogLevel;
use crate::model::ChartError;
use crate::timeline::AmbientZone;

pub const DEFAULT_CONFIG_PATH: &str = "./sunshine.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "./out";

pub const ENV_CONFIG: &str = "SUNSHINE_CONFIG";
pub const ENV_OUTPUT_DIR: &str = "SUNSHINE_OUTPUT_DIR";
pub const ENV_LOG_LEVEL: &str = "SUNSHINE_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "SUNSHINE_LOG_FILE";

// ---------------------------------------------------------------------------
// File configuration
// ---------------------------------------------------------------------------

/// `[chart]` table: SVG geometry and rendering switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_outer_width")]
    pub outer_width: f64,
    #[serde(default = "default_outer_height")]
    pub outer_height: f64,
    #[serde(default = "default_margin_top")]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_right: f64,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: f64,
    #[serde(default = "default_margin_left")]
    pub margin_left: f64,
    /// Draw the month / time-of-day axes after the sun bands.
    #[serde(default)]
    pub axes: bool,
    /// Share one x-scale across all charts (last cover load wins).
    #[serde(default)]
    pub shared_x_scale: bool,
    /// Pins the ambient zone to a fixed offset east of UTC. Unset means
    /// the zone of the machine running the render.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_outer_width() -> f64 {
    960.0
}

fn default_outer_height() -> f64 {
    500.0
}

fn default_margin_top() -> f64 {
    20.0
}

fn default_margin_bottom() -> f64 {
    20.0
}

fn default_margin_left() -> f64 {
    70.0
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            outer_width: default_outer_width(),
            outer_height: default_outer_height(),
            margin_top: default_margin_top(),
            margin_right: 0.0,
            margin_bottom: default_margin_bottom(),
            margin_left: default_margin_left(),
            axes: false,
            shared_x_scale: false,
            utc_offset_minutes: None,
        }
    }
}

impl ChartSettings {
    /// Plot width inside the margins.
    pub fn width(&self) -> f64 {
        self.outer_width - self.margin_left - self.margin_right
    }

    /// Plot height inside the margins.
    pub fn height(&self) -> f64 {
        self.outer_height - self.margin_top - self.margin_bottom
    }

    pub fn zone(&self) -> Result<AmbientZone, ChartError> {
        match self.utc_offset_minutes {
            None => Ok(AmbientZone::System),
            Some(minutes) => AmbientZone::fixed_minutes(minutes).ok_or_else(|| {
                ChartError::ConfigError(format!("utc_offset_minutes {} is out of range", minutes))
            }),
        }
    }
}

/// `[fetch]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Serve every URL from this directory instead of the network.
    #[serde(default)]
    pub offline_dir: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout_secs: default_timeout_secs(),
            offline_dir: None,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Contents of the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    /// Fetch the legacy weather report and log one sample row.
    #[serde(default)]
    pub log_sample_weather: bool,
    /// Replace registry cities by key, or add new ones.
    #[serde(default)]
    pub cities: Vec<City>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self, ChartError> {
        let config: FileConfig = toml::from_str(content)?;
        config.chart.zone()?;
        Ok(config)
    }

    /// Loads the file at `path`.
    ///
    /// When `required` is false a missing file yields the defaults; a file
    /// that exists but does not parse is always an error.
    pub fn from_file<P: AsRef<Path>>(path: P, required: bool) -> Result<Self, ChartError> {
        let path = path.as_ref();
        if !required && !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ChartError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }
}

// ---------------------------------------------------------------------------
// Full run configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub file: FileConfig,
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ChartError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ChartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // An explicitly named config file must exist.
        let (config_path, required) = match non_empty(ENV_CONFIG) {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        let file = FileConfig::from_file(&config_path, required)?;

        let log_level = match non_empty(ENV_LOG_LEVEL) {
            Some(level) => level
                .parse::<LogLevel>()
                .map_err(|e| ChartError::ConfigError(format!("{}: {}", ENV_LOG_LEVEL, e)))?,
            None => LogLevel::Info,
        };

        Ok(AppConfig {
            file,
            config_path,
            output_dir: PathBuf::from(
                non_empty(ENV_OUTPUT_DIR).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            log_level,
            log_file: non_empty(ENV_LOG_FILE),
        })
    }

    /// Cities to render, registry first with file overrides applied.
    pub fn cities(&self) -> Vec<City> {
        merge_cities(default_cities(), &self.file.cities)
    }

    /// The cities named on the command line, or all of them.
    pub fn selected_cities(&self, keys: &[String]) -> Result<Vec<City>, ChartError> {
        select_cities(self.cities(), keys)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
