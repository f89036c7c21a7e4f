//! Weather provider client
//!
//! Wraps an OpenWeatherMap-style current-conditions endpoint: city name
//! in, provider-formatted text out. Failures surface as errors; the
//! pipeline decides whether to soften them.

use crate::config::WeatherConfig;
use crate::error::{AskRouteError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Weather lookup trait
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a city, as display text
    async fn current_weather(&self, city: &str) -> Result<String>;
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherMap {
    http_client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherMap {
    /// Create new client from configuration
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AskRouteError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(WeatherConfig::default())
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
    wind: Option<WeatherWind>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
    speed: f64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherMap {
    async fn current_weather(&self, city: &str) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AskRouteError::Config("weather provider API key is not set".to_string())
        })?;

        let response = self
            .http_client
            .get(&self.config.url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await
            .map_err(AskRouteError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AskRouteError::ExternalService(format!(
                "Weather service error (HTTP {}): {}",
                status, body
            )));
        }

        let weather: WeatherResponse = response.json().await.map_err(AskRouteError::Http)?;

        Ok(format_conditions(&weather))
    }
}

fn format_conditions(weather: &WeatherResponse) -> String {
    let description = weather
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown conditions");

    let mut text = format!(
        "In {}, the current weather is as follows:\nDetailed status: {}\nTemperature: {:.2}°C (feels like {:.2}°C)\nHumidity: {:.0}%",
        weather.name, description, weather.main.temp, weather.main.feels_like, weather.main.humidity
    );

    if let Some(ref wind) = weather.wind {
        text.push_str(&format!("\nWind speed: {:.2} m/s", wind.speed));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_conditions() {
        let weather = WeatherResponse {
            name: "Berlin".to_string(),
            weather: vec![WeatherCondition {
                description: "scattered clouds".to_string(),
            }],
            main: WeatherMain {
                temp: 18.3,
                feels_like: 17.9,
                humidity: 64.0,
            },
            wind: Some(WeatherWind { speed: 3.2 }),
        };

        let text = format_conditions(&weather);
        assert!(text.contains("Berlin"));
        assert!(text.contains("scattered clouds"));
        assert!(text.contains("18.30°C"));
        assert!(text.contains("Wind speed: 3.20 m/s"));
    }

    #[test]
    fn test_format_conditions_without_wind() {
        let weather = WeatherResponse {
            name: "Lima".to_string(),
            weather: vec![],
            main: WeatherMain {
                temp: 21.0,
                feels_like: 21.0,
                humidity: 80.0,
            },
            wind: None,
        };

        let text = format_conditions(&weather);
        assert!(text.contains("unknown conditions"));
        assert!(!text.contains("Wind speed"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let config = WeatherConfig {
            api_key: None,
            ..WeatherConfig::default()
        };
        let client = OpenWeatherMap::new(config).unwrap();
        let err = client.current_weather("Berlin").await.unwrap_err();
        assert!(matches!(err, AskRouteError::Config(_)));
    }
}
