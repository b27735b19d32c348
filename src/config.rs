//! Configuration management module
//!
//! Loads and validates environment-based configuration.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::engine::history::DEFAULT_CAPACITY;

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for environment variable {0}")]
    ParseError(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Sensor hub configuration settings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SensorSettings {
    /// Interval in milliseconds between hub snapshots
    #[validate(range(min = 100, max = 60000))]
    pub interval_ms: u64,
    /// Run the simulated hub instead of waiting for external readings
    pub simulation: bool,
}

/// Analysis engine configuration settings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EngineSettings {
    /// Number of analyses kept for trend detection
    #[validate(range(min = 10, max = 100000))]
    pub history_capacity: usize,
    /// Seed for the engine's random placeholders; entropy when unset
    pub rng_seed: Option<u64>,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub sensor: SensorSettings,
    pub engine: EngineSettings,
}

fn parse_var<T: FromStr>(key: &'static str, default: &str) -> Result<T, SettingsError> {
    env::var(key)
        .unwrap_or_else(|_| default.into())
        .parse()
        .map_err(|_| SettingsError::ParseError(key))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        let rng_seed = match env::var("ENGINE_RNG_SEED") {
            Ok(seed) => Some(
                seed.parse()
                    .map_err(|_| SettingsError::ParseError("ENGINE_RNG_SEED"))?,
            ),
            Err(_) => None,
        };

        let settings = Self {
            server: ServerSettings {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
                port: parse_var("SERVER_PORT", "8080")?,
            },
            sensor: SensorSettings {
                interval_ms: parse_var("SENSOR_INTERVAL_MS", "2000")?,
                simulation: parse_var("SENSOR_SIMULATION", "true")?,
            },
            engine: EngineSettings {
                history_capacity: parse_var(
                    "ENGINE_HISTORY_CAPACITY",
                    &DEFAULT_CAPACITY.to_string(),
                )?,
                rng_seed,
            },
        };

        settings.ensure_valid()?;
        Ok(settings)
    }

    fn ensure_valid(&self) -> Result<(), SettingsError> {
        self.sensor
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        self.engine
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        Ok(())
    }
}
