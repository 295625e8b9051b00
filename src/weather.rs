//! Weather categories and the OpenWeather adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;
use crate::traits::WeatherProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Fog,
    Haze,
    Rain,
}

impl WeatherCategory {
    pub const ALL: [WeatherCategory; 5] = [
        WeatherCategory::Clear,
        WeatherCategory::Clouds,
        WeatherCategory::Fog,
        WeatherCategory::Haze,
        WeatherCategory::Rain,
    ];

    /// Map an OpenWeather `main` condition onto the trained categories.
    pub fn from_condition(main: &str) -> Self {
        match main {
            "Rain" | "Drizzle" | "Thunderstorm" => WeatherCategory::Rain,
            "Mist" | "Haze" | "Smoke" => WeatherCategory::Haze,
            "Fog" => WeatherCategory::Fog,
            "Clouds" => WeatherCategory::Clouds,
            _ => WeatherCategory::Clear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Clouds => "Clouds",
            WeatherCategory::Fog => "Fog",
            WeatherCategory::Haze => "Haze",
            WeatherCategory::Rain => "Rain",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve the weather for one trip.
///
/// Future trips are always `Clear`; forecasting is not supported. Live lookup
/// failures degrade to `Clear` as well.
pub fn resolve_weather<W: WeatherProvider + ?Sized>(provider: &W, is_future: bool) -> WeatherCategory {
    if is_future {
        tracing::info!("future trip, assuming clear weather");
        return WeatherCategory::Clear;
    }

    match provider.live_weather() {
        Ok(weather) => {
            tracing::info!(%weather, "live weather fetched");
            weather
        }
        Err(err) => {
            tracing::warn!(error = %err, "weather lookup failed, assuming clear weather");
            WeatherCategory::Clear
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub base_url: String,
    /// City query, e.g. "Ghaziabad,IN".
    pub city: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            city: "Ghaziabad,IN".to_string(),
            api_key: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: OpenWeatherConfig,
    client: reqwest::blocking::Client,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn live_weather(&self) -> Result<WeatherCategory, WeatherError> {
        let api_key = self.config.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", self.config.city.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OpenWeatherResponse>())?;

        body.category().ok_or(WeatherError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    #[serde(default)]
    weather: Vec<OpenWeatherCondition>,
}

impl OpenWeatherResponse {
    fn category(&self) -> Option<WeatherCategory> {
        self.weather
            .first()
            .map(|condition| WeatherCategory::from_condition(&condition.main))
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    main: String,
}
