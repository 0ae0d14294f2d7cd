//! Open-Meteo forecast client.

use std::sync::Arc;
use std::time::Duration;

use northwind_core::{NetworkError, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::align::{parse_date, parse_timestamp};
use crate::error::WeatherError;
use crate::types::{
    Coordinate, DailyEntry, Forecast, ForecastSeries, HourlySample, WeatherSnapshot,
};

const USER_AGENT: &str = concat!("Northwind/", env!("CARGO_PKG_VERSION"));

const HOURLY_FIELDS: &str = "relative_humidity_2m,apparent_temperature";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    current_weather: Option<CurrentWeatherRaw>,
    hourly: Option<HourlyRaw>,
    daily: Option<DailyRaw>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherRaw {
    temperature: f64,
    weathercode: i32,
    windspeed: Option<f64>,
    time: Option<String>,
}

/// Both humidity spellings occur depending on API version; the newer one wins.
#[derive(Debug, Deserialize)]
struct HourlyRaw {
    time: Option<Vec<String>>,
    relative_humidity_2m: Option<Vec<Option<f64>>>,
    relativehumidity_2m: Option<Vec<Option<f64>>>,
    apparent_temperature: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct DailyRaw {
    time: Option<Vec<String>>,
    weather_code: Option<Vec<Option<i32>>>,
    weathercode: Option<Vec<Option<i32>>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
}

fn at<T: Copy>(series: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    series.as_ref()?.get(index).copied().flatten()
}

impl TryFrom<ForecastResponse> for Forecast {
    type Error = WeatherError;

    fn try_from(raw: ForecastResponse) -> Result<Self, Self::Error> {
        let current = raw
            .current_weather
            .ok_or(WeatherError::MissingCurrentWeather)?;

        let current = WeatherSnapshot {
            temperature_celsius: current.temperature,
            weather_code: current.weathercode,
            wind_speed: current.windspeed,
            observation_time: current.time.as_deref().and_then(parse_timestamp),
        };

        let hourly = raw
            .hourly
            .map(|h| {
                let humidity = h.relative_humidity_2m.or(h.relativehumidity_2m);
                h.time
                    .unwrap_or_default()
                    .iter()
                    .enumerate()
                    .map(|(i, t)| HourlySample {
                        timestamp: parse_timestamp(t),
                        humidity: at(&humidity, i),
                        apparent_temperature: at(&h.apparent_temperature, i),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let daily = raw.daily.and_then(|d| {
            let times = d.time?;
            let codes = d.weather_code.or(d.weathercode);
            Some(
                times
                    .iter()
                    .enumerate()
                    .map(|(i, t)| DailyEntry {
                        date: parse_date(t),
                        min_temp: at(&d.temperature_2m_min, i),
                        max_temp: at(&d.temperature_2m_max, i),
                        weather_code: at(&codes, i),
                    })
                    .collect(),
            )
        });

        Ok(Forecast {
            current,
            series: ForecastSeries { hourly, daily },
        })
    }
}

/// Client for the forecast and geocoding endpoints
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    pub(crate) client: Arc<Client>,
    forecast_url: String,
    pub(crate) geocoding_url: String,
    pub(crate) search_count: u32,
    pub(crate) language: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            forecast_url: config.forecast_url.clone(),
            geocoding_url: config.geocoding_url.clone(),
            search_count: config.search_count,
            language: config.language.clone(),
        })
    }

    /// Fetch current conditions plus hourly and daily series for a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, coordinate: Coordinate) -> Result<Forecast, WeatherError> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let body = check_status(response).await?;
        let raw: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Forecast::try_from(raw)
    }
}

/// Turn a non-2xx response into an error, otherwise return the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<String, WeatherError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Request to {} returned status {}", response.url(), status);
        return Err(NetworkError::ServerError {
            status: status.as_u16(),
            message: format!("Request failed: {}", status),
        }
        .into());
    }
    Ok(response.text().await?)
}
