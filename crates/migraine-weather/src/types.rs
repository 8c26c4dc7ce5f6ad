use chrono::{DateTime, Utc};
use migraine_core::{AppError, NetworkError, WeatherError};
use serde::{Deserialize, Serialize};

/// Geographic location a reading is requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable place name, not validated
    pub label: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.into(),
        }
    }
}

/// Canonical current-conditions reading.
///
/// Only ever built from a complete provider response (or from values the
/// caller already holds); a failed or partial fetch yields a [`FetchError`]
/// instead, never a zero-filled reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub uv_index: u32,
    /// Relative humidity, 0..=100
    pub humidity_percent: u8,
    pub air_pressure_hpa: u32,
    pub location: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReading {
    /// Build a reading from already-normalized values.
    ///
    /// Humidity above 100 is capped at 100. `temperature_celsius` must be
    /// finite; callers holding untrusted input reject NaN and infinities
    /// before getting here.
    pub fn new(
        temperature_celsius: f64,
        uv_index: u32,
        humidity_percent: u8,
        air_pressure_hpa: u32,
        location: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(
            temperature_celsius.is_finite(),
            "temperature must be finite, got {}",
            temperature_celsius
        );
        Self {
            temperature_celsius,
            uv_index,
            humidity_percent: humidity_percent.min(100),
            air_pressure_hpa,
            location: location.into(),
            observed_at,
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather fetch errors.
///
/// Every variant is surfaced to the caller unchanged; the client never
/// retries or falls back to synthetic data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection refused, reset).
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    /// Provider answered with a non-2xx status.
    #[error("Weather API returned HTTP {status}")]
    HttpStatus { status: u16 },
    /// Body did not match the expected schema.
    #[error("Failed to decode weather response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classify a reqwest error raised while sending or reading a request.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "Unable to reach the weather service. Check your internet connection.",
            FetchError::Timeout => "The weather service took too long to respond. Please try again.",
            FetchError::HttpStatus { status } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            FetchError::HttpStatus { .. } => "The weather request was rejected. Please try again.",
            FetchError::Decode(_) => "Received unexpected weather data. Please try again.",
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        let network = match e {
            FetchError::Network(s) => NetworkError::ConnectionFailed(s),
            FetchError::Timeout => NetworkError::Timeout,
            FetchError::HttpStatus { status } => NetworkError::ServerError {
                status,
                message: format!("weather API returned HTTP {}", status),
            },
            FetchError::Decode(s) => NetworkError::InvalidResponse(s),
        };
        AppError::Network(network)
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        AppError::Weather(WeatherError::LocationUnavailable(e.to_string()))
    }
}
