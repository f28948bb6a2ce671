use crate::{
    Config, FetchError, LocationId, LookupError, WeatherResult,
    provider::{metaweather::MetaWeatherProvider, openmeteo::OpenMeteoProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod metaweather;
pub mod openmeteo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    MetaWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "openmeteo",
            ProviderId::MetaWeather => "metaweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::MetaWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            "metaweather" => Ok(ProviderId::MetaWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openmeteo, metaweather."
            )),
        }
    }
}

/// The two remote calls behind one city lookup.
///
/// Implementations keep no state between calls; repeating a call with the
/// same input against the same remote data yields the same result.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve free-text city name to an opaque location identifier.
    async fn resolve_location(&self, city: &str) -> Result<LocationId, LookupError>;

    /// Fetch current conditions for an identifier from `resolve_location`.
    async fn fetch_weather(&self, id: &LocationId) -> Result<WeatherResult, FetchError>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let http = http_client(config.request_timeout())?;
    let endpoints = config.provider_config(id).cloned().unwrap_or_default();

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenMeteo => Box::new(OpenMeteoProvider::with_endpoints(
            http,
            endpoints.base_url,
            endpoints.geocoding_url,
        )),
        ProviderId::MetaWeather => {
            Box::new(MetaWeatherProvider::with_base_url(http, endpoints.base_url))
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

fn http_client(timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Trim a configured base URL so paths can be appended with a leading slash.
fn base_or(configured: Option<String>, fallback: &str) -> String {
    configured
        .unwrap_or_else(|| fallback.to_string())
        .trim_end_matches('/')
        .to_string()
}
