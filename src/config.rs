//! Monitor configuration.
//!
//! Loaded from a TOML file (`supt.toml` by default, or the path in
//! `SUPT_CONFIG`). Every field has a default so a partial file, or no file at
//! all, still yields a runnable configuration.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::analysis::EngineParams;
use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "supt.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub feeds: FeedConfig,
    pub seismic: SeismicConfig,
    pub solar: SolarConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub noaa_kp_url: String,
    pub noaa_plasma_url: String,
    pub ingv_event_url: String,
    /// Single-attempt HTTP timeout applied to every feed.
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            noaa_kp_url: "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json"
                .to_string(),
            noaa_plasma_url: "https://services.swpc.noaa.gov/products/solar-wind/plasma-1-day.json"
                .to_string(),
            ingv_event_url: "https://webservices.ingv.it/fdsnws/event/1/query".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeismicConfig {
    /// Region id from `regions::REGION_REGISTRY`.
    pub region: String,
    /// Static events file used when the INGV feed is unavailable.
    pub local_events_path: String,
    /// Only events from the last `window_days` days enter the metrics.
    pub window_days: i64,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            region: "campi_flegrei".to_string(),
            local_events_path: "data/events.csv".to_string(),
            window_days: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolarConfig {
    /// Centre of the synthetic ψₛ series used when NOAA is unreachable.
    pub default_psi_s: f64,
    /// Kp used when the K-index product cannot be fetched.
    pub fallback_kp: f64,
    /// Dynamic pressure (nPa) that maps to ψₛ = 1.
    pub reference_pressure_npa: f64,
    /// Latest sample older than this is flagged stale.
    pub max_sample_age_minutes: u64,
    /// Hours of plasma history kept for the ψₛ series.
    pub history_hours: i64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            default_psi_s: 0.72,
            fallback_kp: 0.0,
            reference_pressure_npa: 10.0,
            max_sample_age_minutes: 180,
            history_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub shallow_depth_km: f64,
    pub depth_clip_km: f64,
    pub forecast_amplitude: f64,
    pub forecast_period_hours: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            shallow_depth_km: params.shallow_depth_km,
            depth_clip_km: params.depth_clip_km,
            forecast_amplitude: params.forecast_amplitude,
            forecast_period_hours: params.forecast_period_hours,
        }
    }
}

impl EngineConfig {
    pub fn params(&self) -> EngineParams {
        EngineParams {
            shallow_depth_km: self.shallow_depth_km,
            depth_clip_km: self.depth_clip_km,
            forecast_amplitude: self.forecast_amplitude,
            forecast_period_hours: self.forecast_period_hours,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of "debug", "info", "warn", "error".
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> LogLevel {
        match self.level.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl MonitorConfig {
    /// Parses a TOML document into a configuration.
    pub fn from_toml_str(text: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Loads configuration from `path`. A missing file yields the defaults;
    /// an unreadable or invalid file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &display)
    }

    /// Resolves the config path from `SUPT_CONFIG` (after loading `.env`)
    /// and loads it.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = std::env::var("SUPT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = MonitorConfig::load("/nonexistent/supt.toml").expect("missing file is not an error");
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.engine.shallow_depth_km, 2.5);
        assert_eq!(config.seismic.window_days, 7);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = MonitorConfig::from_toml_str(
            "[engine]\nshallow_depth_km = 3.0\n\n[feeds]\ntimeout_secs = 5\n",
            "inline",
        )
        .expect("valid toml");
        assert_eq!(config.engine.shallow_depth_km, 3.0);
        assert_eq!(config.engine.forecast_amplitude, 0.3);
        assert_eq!(config.feeds.timeout_secs, 5);
        assert!(config.feeds.noaa_kp_url.contains("swpc.noaa.gov"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[engine\nshallow_depth_km = ").expect("write");
        let result = MonitorConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.min_level(), LogLevel::Info);
        logging.level = "WARN".to_string();
        assert_eq!(logging.min_level(), LogLevel::Warning);
        logging.level = "debug".to_string();
        assert_eq!(logging.min_level(), LogLevel::Debug);
    }
}
