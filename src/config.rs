//! Planner configuration, read from TOML.
//!
//! ```toml
//! [routing]
//! provider = "osrm"
//! base_url = "http://localhost:5000"
//!
//! [weather]
//! city = "Ghaziabad,IN"
//!
//! [estimator]
//! kind = "linear"
//! model_path = "traffic_model_v3.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::directions::{DirectionsClient, DirectionsConfig};
use crate::error::{EstimatorError, RoutingError};
use crate::estimator::{LinearSpeedModel, ProfileSpeedModel};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::traits::{RouteProvider, SpeedEstimator};
use crate::weather::{OpenWeatherClient, OpenWeatherConfig};

pub const GOOGLE_MAPS_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub routing: RoutingConfig,
    pub weather: OpenWeatherConfig,
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum RoutingConfig {
    Osrm(OsrmConfig),
    Google(DirectionsConfig),
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig::Osrm(OsrmConfig::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorConfig {
    #[default]
    Profile,
    Linear {
        model_path: PathBuf,
    },
}

pub type BoxedRouteProvider = Box<dyn RouteProvider + Send + Sync>;
pub type BoxedSpeedEstimator = Box<dyn SpeedEstimator + Send + Sync>;

impl PlannerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Fill missing API keys from the environment.
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials(|name| std::env::var(name).ok())
    }

    /// Fill missing API keys from `lookup`, keyed by environment variable name.
    pub fn with_credentials(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let RoutingConfig::Google(directions) = &mut self.routing {
            if directions.api_key.is_none() {
                directions.api_key = lookup(GOOGLE_MAPS_KEY_VAR);
            }
        }
        if self.weather.api_key.is_none() {
            self.weather.api_key = lookup(OPENWEATHER_KEY_VAR);
        }
        self
    }

    pub fn build_route_provider(&self) -> Result<BoxedRouteProvider, RoutingError> {
        match &self.routing {
            RoutingConfig::Osrm(config) => Ok(Box::new(OsrmClient::new(config.clone())?)),
            RoutingConfig::Google(config) => Ok(Box::new(DirectionsClient::new(config.clone())?)),
        }
    }

    pub fn build_weather_provider(&self) -> Result<OpenWeatherClient, reqwest::Error> {
        if self.weather.api_key.is_none() {
            tracing::warn!("no weather API key configured, live weather will default to clear");
        }
        OpenWeatherClient::new(self.weather.clone())
    }

    pub fn build_estimator(&self) -> Result<BoxedSpeedEstimator, EstimatorError> {
        match &self.estimator {
            EstimatorConfig::Profile => Ok(Box::new(ProfileSpeedModel::default())),
            EstimatorConfig::Linear { model_path } => {
                Ok(Box::new(LinearSpeedModel::from_file(model_path)?))
            }
        }
    }
}
