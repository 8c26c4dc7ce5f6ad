//! Open-Meteo current-conditions client.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use migraine_core::Config;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{FetchError, WeatherReading};

const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";
const FORECAST_PATH: &str = "/v1/forecast";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,surface_pressure,uv_index";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LABEL: &str = "Zurich";
const USER_AGENT: &str = concat!("migraine-tracker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    surface_pressure: f64,
    /// Not reported for every location; treated as 0
    #[serde(default)]
    uv_index: Option<f64>,
}

/// Settings for [`WeatherClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    /// Label used when the caller does not name the location
    pub default_label: String,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: OPEN_METEO_BASE_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            default_label: DEFAULT_LABEL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.weather.api_base_url.clone(),
            timeout: Duration::from_secs(config.weather.timeout_secs),
            default_label: config.location.label.clone(),
            ..Self::default()
        }
    }
}

/// Anything that can produce a current reading for a coordinate.
///
/// Implemented by [`WeatherClient`]; the refresh service is generic over it.
pub trait WeatherSource: Send + Sync {
    fn fetch_reading(
        &self,
        latitude: f64,
        longitude: f64,
        label: Option<&str>,
    ) -> impl Future<Output = Result<WeatherReading, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    default_label: String,
}

impl WeatherClient {
    /// Client for the public Open-Meteo API with a 10 second timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(ClientSettings::default())
    }

    pub fn with_settings(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            default_label: settings.default_label,
        })
    }

    /// Fetch current conditions for a coordinate.
    ///
    /// Performs exactly one request. `label` falls back to the configured
    /// city name.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
        label: Option<&str>,
    ) -> Result<WeatherReading, FetchError> {
        let url = format!("{}{}", self.base_url, FORECAST_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather request failed: {}", e);
                FetchError::from_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather API returned status {}", status);
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read weather response: {}", e);
            FetchError::from_transport(e)
        })?;

        let parsed: ForecastResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Weather response parse error: {}", e);
            FetchError::Decode(e.to_string())
        })?;

        let label = label.unwrap_or(&self.default_label);
        let reading = WeatherReading::from_current(parsed.current, label, Utc::now())?;

        tracing::debug!(
            "Reading for {}: {:.1}°C, UV {}, {}%, {} hPa",
            reading.location,
            reading.temperature_celsius,
            reading.uv_index,
            reading.humidity_percent,
            reading.air_pressure_hpa
        );
        Ok(reading)
    }
}

impl WeatherSource for WeatherClient {
    async fn fetch_reading(
        &self,
        latitude: f64,
        longitude: f64,
        label: Option<&str>,
    ) -> Result<WeatherReading, FetchError> {
        self.fetch_weather(latitude, longitude, label).await
    }
}

impl WeatherReading {
    /// Normalize provider values into the canonical integer fields.
    fn from_current(
        current: CurrentConditions,
        label: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        let temperature = finite("temperature_2m", current.temperature_2m)?;
        let humidity = finite("relative_humidity_2m", current.relative_humidity_2m)?;
        let pressure = finite("surface_pressure", current.surface_pressure)?;
        let uv = match current.uv_index {
            Some(v) => finite("uv_index", v)?,
            None => 0.0,
        };

        Ok(Self {
            temperature_celsius: temperature,
            uv_index: uv.round().max(0.0) as u32,
            humidity_percent: humidity.round().clamp(0.0, 100.0) as u8,
            air_pressure_hpa: pressure.round().max(0.0) as u32,
            location: label.to_string(),
            observed_at,
        })
    }
}

fn finite(field: &str, value: f64) -> Result<f64, FetchError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FetchError::Decode(format!("{} is not a finite number", field)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn current(json: serde_json::Value) -> CurrentConditions {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalizes_provider_values() {
        let c = current(serde_json::json!({
            "temperature_2m": 18.4,
            "relative_humidity_2m": 64,
            "surface_pressure": 1012.6,
            "uv_index": 5.55
        }));
        let reading = WeatherReading::from_current(c, "Lucerne", Utc::now()).unwrap();

        assert!((reading.temperature_celsius - 18.4).abs() < 1e-9);
        assert_eq!(reading.uv_index, 6);
        assert_eq!(reading.humidity_percent, 64);
        assert_eq!(reading.air_pressure_hpa, 1013);
        assert_eq!(reading.location, "Lucerne");
    }

    #[test]
    fn test_missing_uv_defaults_to_zero() {
        let c = current(serde_json::json!({
            "temperature_2m": 12.0,
            "relative_humidity_2m": 70,
            "surface_pressure": 1015.0
        }));
        let reading = WeatherReading::from_current(c, "Geneva", Utc::now()).unwrap();
        assert_eq!(reading.uv_index, 0);
    }

    #[test]
    fn test_null_uv_defaults_to_zero() {
        let c = current(serde_json::json!({
            "temperature_2m": 12.0,
            "relative_humidity_2m": 70,
            "surface_pressure": 1015.0,
            "uv_index": null
        }));
        let reading = WeatherReading::from_current(c, "Geneva", Utc::now()).unwrap();
        assert_eq!(reading.uv_index, 0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let c = current(serde_json::json!({
            "temperature_2m": -3.0,
            "relative_humidity_2m": 104.2,
            "surface_pressure": 998.0,
            "uv_index": -0.4
        }));
        let reading = WeatherReading::from_current(c, "Chur", Utc::now()).unwrap();
        assert_eq!(reading.uv_index, 0);
        assert_eq!(reading.humidity_percent, 100);
        assert_eq!(reading.air_pressure_hpa, 998);
    }

    #[test]
    fn test_missing_mandatory_field_fails_decode() {
        let result: Result<ForecastResponse, _> = serde_json::from_value(serde_json::json!({
            "current": {
                "temperature_2m": 12.0,
                "uv_index": 3.0
            }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_value_is_decode_error() {
        let c = CurrentConditions {
            temperature_2m: f64::NAN,
            relative_humidity_2m: 50.0,
            surface_pressure: 1013.0,
            uv_index: None,
        };
        let err = WeatherReading::from_current(c, "Sion", Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Decode(ref msg) if msg.contains("temperature_2m")));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.weather.timeout_secs = 3;
        config.location.label = "Thun".to_string();

        let settings = ClientSettings::from(&config);
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.default_label, "Thun");
        assert_eq!(settings.base_url, "https://api.open-meteo.com");
        assert!(settings.user_agent.starts_with("migraine-tracker/"));
    }
}
