//! Core library for the `weather` screen.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstraction over weather providers and the two-step lookup pipeline
//! - Screen state, its transitions and the condition → backdrop lookup
//!
//! It is used by `weather-cli`, but does not depend on any terminal or UI toolkit.

pub mod backdrop;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod screen;

pub use backdrop::{Backdrop, image_for};
pub use config::{Config, ProviderConfig};
pub use error::{FetchError, LookupError, PipelineError};
pub use model::{LocationId, WeatherResult};
pub use pipeline::lookup_weather;
pub use provider::{ProviderId, WeatherProvider};
pub use screen::{Action, Effect, ScreenState, ScreenView};
