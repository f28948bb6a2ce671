//! The resolve → fetch chain behind one city lookup.

use tracing::{debug, instrument};

use crate::{PipelineError, WeatherProvider, WeatherResult};

/// Resolve `city` and fetch its current weather.
///
/// The fetch only starts once resolution has succeeded. Neither step is
/// retried; the first failure is returned as is.
#[instrument(skip(provider))]
pub async fn lookup_weather(
    provider: &dyn WeatherProvider,
    city: &str,
) -> Result<WeatherResult, PipelineError> {
    let id = provider.resolve_location(city).await?;
    debug!(id = id.as_str(), "location resolved");

    let result = provider.fetch_weather(&id).await?;
    debug!(location = %result.location, weather = %result.weather, "weather fetched");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchError, LocationId, LookupError};
    use async_trait::async_trait;
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    /// Deterministic in-memory provider.
    #[derive(Debug, Default)]
    struct StubProvider {
        ids: HashMap<String, String>,
        weather: HashMap<String, WeatherResult>,
        resolve_calls: AtomicUsize,
        fetched: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn tokyo() -> Self {
            let mut stub = Self::default();
            stub.ids.insert("Tokyo".into(), "id-42".into());
            stub.weather.insert(
                "id-42".into(),
                WeatherResult {
                    location: "Tokyo".into(),
                    weather: "Clear".into(),
                    temperature: 21.6,
                },
            );
            stub
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn resolve_location(&self, city: &str) -> Result<LocationId, LookupError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            self.ids
                .get(city)
                .map(|id| LocationId::new(id.clone()))
                .ok_or_else(|| LookupError::NotFound(city.to_string()))
        }

        async fn fetch_weather(&self, id: &LocationId) -> Result<WeatherResult, FetchError> {
            self.fetched.lock().unwrap().push(id.as_str().to_string());
            self.weather
                .get(id.as_str())
                .cloned()
                .ok_or(FetchError::MissingField("consolidated_weather"))
        }
    }

    #[tokio::test]
    async fn success_returns_remote_values() {
        let stub = StubProvider::tokyo();

        let result = lookup_weather(&stub, "Tokyo").await.expect("lookup succeeds");

        assert_eq!(result.location, "Tokyo");
        assert_eq!(result.weather, "Clear");
        assert_eq!(result.temperature, 21.6);
        assert_eq!(*stub.fetched.lock().unwrap(), vec!["id-42".to_string()]);
    }

    #[tokio::test]
    async fn lookup_failure_skips_fetch() {
        let stub = StubProvider::tokyo();

        let err = lookup_weather(&stub, "Zzzzz").await.unwrap_err();

        assert!(matches!(err, PipelineError::Lookup(LookupError::NotFound(_))));
        assert!(stub.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_as_fetch() {
        let mut stub = StubProvider::tokyo();
        stub.weather.clear();

        let err = lookup_weather(&stub, "Tokyo").await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(FetchError::MissingField(_))));
    }

    #[tokio::test]
    async fn repeated_lookups_are_identical() {
        let stub = StubProvider::tokyo();

        let first = lookup_weather(&stub, "Tokyo").await.unwrap();
        let second = lookup_weather(&stub, "Tokyo").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.resolve_calls.load(Ordering::SeqCst), 2);
    }
}
