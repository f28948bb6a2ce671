use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

/// City looked up when the screen mounts and nothing else is configured.
pub const DEFAULT_CITY: &str = "San Francisco";

/// Endpoint overrides for a single provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Weather endpoint base, e.g. "https://api.open-meteo.com".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Geocoding endpoint base, for providers that host it separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Optional default provider id, e.g. "openmeteo" or "metaweather".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// City looked up on startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_city: Option<String>,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Example TOML:
    /// [providers.openmeteo]
    /// base_url = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    ///
    /// Falls back to Open-Meteo, which needs no credentials.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::OpenMeteo),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        self.default_city = Some(city.into());
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    pub fn provider_config_mut(&mut self, id: ProviderId) -> &mut ProviderConfig {
        self.providers.entry(id.as_str().to_string()).or_default()
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration TOML")
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the log file written by the terminal screen.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_local_dir().join("weather.log"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-screen", "weather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn empty_config_uses_builtin_defaults() {
        let cfg = Config::default();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::OpenMeteo);
        assert_eq!(cfg.default_city(), "San Francisco");
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn unknown_default_provider_is_an_error() {
        let cfg = Config {
            default_provider: Some("yahoo".into()),
            ..Default::default()
        };
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn blank_default_city_falls_back() {
        let mut cfg = Config::default();
        cfg.set_default_city("   ");
        assert_eq!(cfg.default_city(), DEFAULT_CITY);

        cfg.set_default_city("Tokyo");
        assert_eq!(cfg.default_city(), "Tokyo");
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::MetaWeather);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::MetaWeather);
    }

    #[test]
    fn parses_full_toml() {
        let cfg = Config::from_toml_str(
            r#"
            default_provider = "metaweather"
            default_city = "Oslo"
            request_timeout_secs = 7

            [providers.metaweather]
            base_url = "http://localhost:9000"

            [providers.openmeteo]
            base_url = "http://localhost:9001"
            geocoding_url = "http://localhost:9002"
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::MetaWeather);
        assert_eq!(cfg.default_city(), "Oslo");
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(7)));

        let ow = cfg.provider_config(ProviderId::OpenMeteo).expect("openmeteo section");
        assert_eq!(ow.geocoding_url.as_deref(), Some("http://localhost:9002"));
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::MetaWeather);
        cfg.set_default_city("Lisbon");
        cfg.provider_config_mut(ProviderId::MetaWeather).base_url = Some("http://mw".into());

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let back = Config::from_toml_str(&text).expect("parsable");

        assert_eq!(back, cfg);
    }
}
