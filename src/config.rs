use std::path::PathBuf;

use crate::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_FORECAST_MODEL_PATH, DEFAULT_POLLUTANT_FEATURES_PATH,
    DEFAULT_POLLUTANT_MODEL_PATH,
};

pub const DATASET_ENV: &str = "AQI_DATASET";
pub const POLLUTANT_MODEL_ENV: &str = "AQI_POLLUTANT_MODEL";
pub const POLLUTANT_FEATURES_ENV: &str = "AQI_POLLUTANT_FEATURES";
pub const FORECAST_MODEL_ENV: &str = "AQI_FORECAST_MODEL";

/// Locations of everything loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub pollutant_model_path: PathBuf,
    pub pollutant_features_path: PathBuf,
    pub forecast_model_path: PathBuf,
}

impl AppConfig {
    /// Reads paths from the process environment, falling back to the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            dataset_path: path(DATASET_ENV, DEFAULT_DATASET_PATH),
            pollutant_model_path: path(POLLUTANT_MODEL_ENV, DEFAULT_POLLUTANT_MODEL_PATH),
            pollutant_features_path: path(POLLUTANT_FEATURES_ENV, DEFAULT_POLLUTANT_FEATURES_PATH),
            forecast_model_path: path(FORECAST_MODEL_ENV, DEFAULT_FORECAST_MODEL_PATH),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
