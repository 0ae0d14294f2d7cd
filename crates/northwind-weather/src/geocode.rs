//! Forward geocoding: turn a place name into candidate coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;
use crate::provider::{check_status, WeatherProvider};
use crate::types::Place;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when nothing matched
    #[serde(default)]
    results: Option<Vec<Place>>,
}

impl WeatherProvider {
    /// Search places by name. An empty vector means no matches.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, WeatherError> {
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[
                ("name", query.to_string()),
                ("count", self.search_count.to_string()),
                ("language", self.language.clone()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let body = check_status(response).await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let places = parsed.results.unwrap_or_default();
        tracing::debug!("Search for {:?} matched {} place(s)", query, places.len());
        Ok(places)
    }
}
