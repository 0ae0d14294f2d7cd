use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Geographic coordinate identifying a location for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within the usual latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions from a forecast response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: f64,
    pub weather_code: i32,
    /// km/h
    pub wind_speed: Option<f64>,
    /// Local wall time of the observation; `None` when the API sent something unparseable
    pub observation_time: Option<NaiveDateTime>,
}

/// One hourly forecast sample. Fields come from parallel arrays and are
/// aligned by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub timestamp: Option<NaiveDateTime>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    pub apparent_temperature: Option<f64>,
}

/// One daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: Option<NaiveDate>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub weather_code: Option<i32>,
}

/// Time-ordered hourly and daily series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub hourly: Vec<HourlySample>,
    /// `None` when the response had no usable daily block
    pub daily: Option<Vec<DailyEntry>>,
}

impl ForecastSeries {
    pub fn hourly_times(&self) -> Vec<Option<NaiveDateTime>> {
        self.hourly.iter().map(|s| s.timestamp).collect()
    }
}

/// Everything a successful fetch produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: WeatherSnapshot,
    pub series: ForecastSeries,
}

/// A geocoding search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// "Name, Region, Country" with empty parts dropped
    pub fn label(&self) -> String {
        crate::format::location_label(
            Some(self.name.as_str()),
            self.admin1.as_deref(),
            self.country.as_deref(),
        )
    }
}

/// Last successfully loaded location, persisted across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl PersistedLocation {
    pub fn new(coordinate: Coordinate, label: Option<String>) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            label,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
