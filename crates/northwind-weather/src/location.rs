//! Device position lookup.

use std::time::Duration;

use async_trait::async_trait;
use northwind_core::GeolocationConfig;

use crate::error::LocationError;
use crate::types::Coordinate;

/// Options for a one-shot position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(8000),
        }
    }
}

impl From<&GeolocationConfig> for GeolocationOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.enable_high_accuracy,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Source of the device position
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// False when the platform has no way to locate the device.
    fn is_supported(&self) -> bool;

    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError>;
}

/// Request a position, giving up after `options.timeout`.
pub async fn locate(
    geolocator: &dyn Geolocator,
    options: &GeolocationOptions,
) -> Result<Coordinate, LocationError> {
    if !geolocator.is_supported() {
        return Err(LocationError::Unsupported);
    }

    match tokio::time::timeout(options.timeout, geolocator.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}

/// Geolocator backed by a configured position.
///
/// Without a position the platform is treated as unsupported.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinate>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    pub fn from_config(config: &GeolocationConfig) -> Self {
        Self::new(
            config
                .fixed_position()
                .map(|(lat, lon)| Coordinate::new(lat, lon)),
        )
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    fn is_supported(&self) -> bool {
        self.position.is_some()
    }

    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError> {
        tracing::debug!(
            "Using configured position (high accuracy requested: {})",
            options.enable_high_accuracy
        );
        let position = self.position.ok_or(LocationError::Unsupported)?;
        if !position.is_valid() {
            return Err(LocationError::Other(format!(
                "configured position {} is out of range",
                position
            )));
        }
        Ok(position)
    }
}
