//! Weather-specific error types.

use northwind_core::{NetworkError, ReqwestErrorExt, StorageError};
use thiserror::Error;

/// Location service errors
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unsupported")]
    Unsupported,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No current weather data available")]
    MissingCurrentWeather,
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Network(e.into_network_error())
    }
}

impl From<WeatherError> for northwind_core::AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(n) => northwind_core::AppError::Network(n),
            WeatherError::Storage(s) => northwind_core::AppError::Storage(s),
            WeatherError::Parse(msg) => {
                northwind_core::AppError::Network(NetworkError::InvalidResponse(msg))
            }
            other => northwind_core::AppError::Other(anyhow::Error::new(other)),
        }
    }
}

impl WeatherError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            Self::Parse(_) => "Received an unexpected response. Please try again.",
            Self::MissingCurrentWeather => "No current weather for this place. Please try again.",
            Self::Location(LocationError::Unsupported) => "Geolocation is not available.",
            Self::Location(_) => "Could not determine your location.",
            Self::Storage(e) => e.user_message(),
        }
    }
}
