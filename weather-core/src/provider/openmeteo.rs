use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    error::{FetchError, LookupError, truncate_body},
    model::{LocationId, WeatherResult},
};

use super::{WeatherProvider, base_or};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

/// Client for the Open-Meteo geocoding and forecast APIs.
///
/// Location identifiers are GeoNames ids; the fetch step looks the id up
/// again to get coordinates and a display name.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    geocoding_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_endpoints(Client::new(), None, None)
    }

    pub fn with_endpoints(
        http: Client,
        base_url: Option<String>,
        geocoding_url: Option<String>,
    ) -> Self {
        Self {
            base_url: base_or(base_url, DEFAULT_BASE_URL),
            geocoding_url: base_or(geocoding_url, DEFAULT_GEOCODING_URL),
            http,
        }
    }

    async fn fetch_place(&self, id: &LocationId) -> Result<OmPlace, FetchError> {
        let url = format!("{}/v1/get", self.geocoding_url);
        let res = self
            .http
            .get(&url)
            .query(&[("id", id.as_str())])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        read_json(res).await
    }

    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<OmCurrent, FetchError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let parsed: OmForecastResponse = read_json(res).await?;
        parsed
            .current_weather
            .ok_or(FetchError::MissingField("current_weather"))
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    results: Option<Vec<OmSearchResult>>,
}

#[derive(Debug, Deserialize)]
struct OmSearchResult {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: Option<OmCurrent>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature: f64,
    weathercode: u8,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    #[instrument(skip(self), fields(provider = "openmeteo"))]
    async fn resolve_location(&self, city: &str) -> Result<LocationId, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyCity);
        }

        let url = format!("{}/v1/search", self.geocoding_url);
        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
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

        let parsed: OmSearchResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| LookupError::NotFound(city.to_string()))?;

        debug!(name = %first.name, id = first.id, "resolved location");
        Ok(LocationId::new(first.id.to_string()))
    }

    #[instrument(skip(self, id), fields(provider = "openmeteo", id = id.as_str()))]
    async fn fetch_weather(&self, id: &LocationId) -> Result<WeatherResult, FetchError> {
        let place = self.fetch_place(id).await?;

        let location = place.name.ok_or(FetchError::MissingField("name"))?;
        let latitude = place.latitude.ok_or(FetchError::MissingField("latitude"))?;
        let longitude = place.longitude.ok_or(FetchError::MissingField("longitude"))?;

        let current = self.fetch_current(latitude, longitude).await?;

        Ok(WeatherResult {
            location,
            weather: condition_label(current.weathercode).to_string(),
            temperature: current.temperature,
        })
    }
}

async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, FetchError> {
    let status: StatusCode = res.status();
    let body = res.text().await.map_err(FetchError::Transport)?;

    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Map a WMO weather code onto the condition labels used for backdrops.
pub fn condition_label(code: u8) -> &'static str {
    match code {
        0 => "Clear",
        1 | 2 => "Light Cloud",
        3 | 45 | 48 => "Heavy Cloud",
        51 | 53 | 55 | 61 => "Light Rain",
        63 | 65 => "Heavy Rain",
        56 | 57 | 66 | 67 => "Sleet",
        71 | 73 | 75 | 77 | 85 | 86 => "Snow",
        80..=82 => "Showers",
        95 => "Thunderstorm",
        96 | 99 => "Hail",
        _ => "Unknown",
    }
}
