//! Server configuration

use anyhow::{Context, Result};
use hos_lib::limits::{DayLogMode, ScheduleOptions};
use serde::Deserialize;
use std::time::Duration;

/// Server configuration, read from `HOS_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name attached to every structured log record
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Upper bound for a single stop location lookup
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// `parity` or `stop_aware`
    #[serde(default = "default_day_log_mode")]
    pub day_log_mode: String,

    #[serde(default)]
    pub rest_in_sleeper_berth: bool,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "hos-server".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_lookup_timeout_ms() -> u64 {
    500
}

fn default_day_log_mode() -> String {
    "parity".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            day_log_mode: default_day_log_mode(),
            rest_in_sleeper_berth: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment; unset keys take their defaults
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("HOS"))
            .build()?;

        Self::from_config(config)
    }

    /// A malformed value is an error rather than a silent reset to defaults
    pub fn from_config(config: config::Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("Invalid HOS_* server configuration")
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn schedule_options(&self) -> Result<ScheduleOptions> {
        let day_log_mode: DayLogMode = self
            .day_log_mode
            .parse()
            .with_context(|| format!("Invalid HOS_DAY_LOG_MODE '{}'", self.day_log_mode))?;

        Ok(ScheduleOptions {
            day_log_mode,
            rest_in_sleeper_berth: self.rest_in_sleeper_berth,
            ..ScheduleOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.lookup_timeout(), Duration::from_millis(500));
        assert_eq!(
            config.schedule_options().unwrap().day_log_mode,
            DayLogMode::Parity
        );
    }

    #[test]
    fn test_schedule_options_from_config() {
        let config = ServerConfig {
            day_log_mode: "stop-aware".to_string(),
            rest_in_sleeper_berth: true,
            ..ServerConfig::default()
        };
        let options = config.schedule_options().unwrap();
        assert_eq!(options.day_log_mode, DayLogMode::StopAware);
        assert!(options.rest_in_sleeper_berth);
    }

    #[test]
    fn test_from_config_reads_overrides() {
        let source = config::Config::builder()
            .set_override("api_port", "9090")
            .unwrap()
            .set_override("day_log_mode", "stop_aware")
            .unwrap()
            .build()
            .unwrap();
        let config = ServerConfig::from_config(source).unwrap();
        assert_eq!(config.api_port, 9090);
        assert_eq!(config.day_log_mode, "stop_aware");
        assert_eq!(config.lookup_timeout_ms, 500);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let source = config::Config::builder()
            .set_override("api_port", "abc")
            .unwrap()
            .set_override("day_log_mode", "stop_aware")
            .unwrap()
            .build()
            .unwrap();
        assert!(ServerConfig::from_config(source).is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let config = ServerConfig {
            day_log_mode: "hourly".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.schedule_options().is_err());
    }
}
