use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::{FetchError, LookupError, truncate_body},
    model::{LocationId, WeatherResult},
};

use super::{WeatherProvider, base_or};

pub const DEFAULT_BASE_URL: &str = "https://www.metaweather.com";

/// Client for the MetaWeather location search and location endpoints.
///
/// Location identifiers are "where on earth" ids (woeid).
#[derive(Debug, Clone)]
pub struct MetaWeatherProvider {
    base_url: String,
    http: Client,
}

impl MetaWeatherProvider {
    pub fn new() -> Self {
        Self::with_base_url(Client::new(), None)
    }

    pub fn with_base_url(http: Client, base_url: Option<String>) -> Self {
        Self {
            base_url: base_or(base_url, DEFAULT_BASE_URL),
            http,
        }
    }
}

impl Default for MetaWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MwSearchEntry {
    title: String,
    woeid: i64,
}

#[derive(Debug, Deserialize)]
struct MwConsolidated {
    weather_state_name: Option<String>,
    the_temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MwLocationResponse {
    title: Option<String>,
    #[serde(default)]
    consolidated_weather: Vec<MwConsolidated>,
}

#[async_trait]
impl WeatherProvider for MetaWeatherProvider {
    #[instrument(skip(self), fields(provider = "metaweather"))]
    async fn resolve_location(&self, city: &str) -> Result<LocationId, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyCity);
        }

        let url = format!("{}/api/location/search/", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("query", city)])
            .send()
            .await
            .map_err(LookupError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::Transport)?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let entries: Vec<MwSearchEntry> =
            serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))?;

        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(city.to_string()))?;

        debug!(title = %first.title, woeid = first.woeid, "resolved location");
        Ok(LocationId::new(first.woeid.to_string()))
    }

    #[instrument(skip(self, id), fields(provider = "metaweather", id = id.as_str()))]
    async fn fetch_weather(&self, id: &LocationId) -> Result<WeatherResult, FetchError> {
        let url = format!("{}/api/location/{}/", self.base_url, id.as_str());
        let res = self.http.get(&url).send().await.map_err(FetchError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: MwLocationResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let location = parsed.title.ok_or(FetchError::MissingField("title"))?;
        let today = parsed
            .consolidated_weather
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("consolidated_weather"))?;

        Ok(WeatherResult {
            location,
            weather: today
                .weather_state_name
                .ok_or(FetchError::MissingField("weather_state_name"))?,
            temperature: today.the_temp.ok_or(FetchError::MissingField("the_temp"))?,
        })
    }
}
