//! Screen state - single source of truth for the weather screen
//!
//! Only `ScreenState::update` mutates the state. Remote work is requested by
//! returning an `Effect`; its outcome comes back as another `Action`.

use tracing::{debug, warn};

use crate::{
    WeatherResult,
    backdrop::{Backdrop, image_for},
};

/// Shown whenever the latest lookup failed, whatever the cause.
pub const ERROR_MESSAGE: &str = "Could not load weather, please try a different city.";

/// Where the screen is in its lookup cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(WeatherResult),
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A city was submitted from the search box (or at mount).
    CitySubmit(String),

    /// A chain finished successfully.
    WeatherDidLoad {
        generation: u64,
        result: WeatherResult,
    },

    /// A chain failed; `error` is only logged.
    WeatherDidFail { generation: u64, error: String },
}

/// Side effects requested by `ScreenState::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the resolve → fetch chain for `city` and report back with `generation`.
    LookupWeather { city: String, generation: u64 },
}

/// What the screen should show, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView<'a> {
    Loading,
    Error {
        message: &'a str,
    },
    Weather {
        location: &'a str,
        weather: &'a str,
        temperature: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    phase: Phase,
    /// Last successful result, kept while a later chain loads or fails.
    last_result: WeatherResult,
    error_message: String,
    generation: u64,
}

impl ScreenState {
    /// Create the state and request the initial lookup for `default_city`.
    pub fn mount(default_city: &str) -> (Self, Option<Effect>) {
        let mut state = Self {
            error_message: ERROR_MESSAGE.to_string(),
            ..Self::default()
        };
        let effect = state.update(Action::CitySubmit(default_city.to_string()));
        (state, effect)
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::CitySubmit(city) => {
                let city = city.trim();
                if city.is_empty() {
                    return None;
                }

                self.generation += 1;
                self.phase = Phase::Loading;
                debug!(city, generation = self.generation, "lookup started");

                Some(Effect::LookupWeather {
                    city: city.to_string(),
                    generation: self.generation,
                })
            }

            Action::WeatherDidLoad { generation, result } => {
                if !self.is_current(generation) {
                    debug!(generation, current = self.generation, "dropping superseded result");
                    return None;
                }

                self.last_result = result.clone();
                self.phase = Phase::Success(result);
                None
            }

            Action::WeatherDidFail { generation, error } => {
                if !self.is_current(generation) {
                    debug!(generation, current = self.generation, "dropping superseded failure");
                    return None;
                }

                warn!(%error, "weather lookup failed");
                self.phase = Phase::Failure;
                None
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.is_loading()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.phase, Phase::Failure)
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn location(&self) -> &str {
        &self.last_result.location
    }

    pub fn weather(&self) -> &str {
        &self.last_result.weather
    }

    pub fn temperature(&self) -> f64 {
        self.last_result.temperature
    }

    pub fn view(&self) -> ScreenView<'_> {
        match self.phase {
            Phase::Loading => ScreenView::Loading,
            Phase::Failure => ScreenView::Error {
                message: &self.error_message,
            },
            Phase::Idle | Phase::Success(_) => ScreenView::Weather {
                location: self.location(),
                weather: self.weather(),
                temperature: format_temperature(self.temperature()),
            },
        }
    }

    /// Background keyed by the last successful condition.
    pub fn backdrop(&self) -> Backdrop {
        let weather = self.weather();
        image_for((!weather.is_empty()).then_some(weather))
    }
}

/// Whole degrees, halves rounded up: 21.6 => "22°", -2.5 => "-2°".
pub fn format_temperature(temperature: f64) -> String {
    let rounded = (temperature + 0.5).floor() as i64;
    format!("{rounded}°")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::DEFAULT_BACKDROP;

    fn tokyo() -> WeatherResult {
        WeatherResult {
            location: "Tokyo".into(),
            weather: "Clear".into(),
            temperature: 21.6,
        }
    }

    fn loaded(result: WeatherResult) -> ScreenState {
        let (mut state, _) = ScreenState::mount("San Francisco");
        let generation = state.generation();
        state.update(Action::WeatherDidLoad { generation, result });
        state
    }

    #[test]
    fn mount_requests_default_city_once() {
        let (state, effect) = ScreenState::mount("San Francisco");

        assert_eq!(
            effect,
            Some(Effect::LookupWeather {
                city: "San Francisco".into(),
                generation: 1,
            })
        );
        assert!(state.is_loading());
        assert!(!state.is_error());
        assert_eq!(state.error_message(), ERROR_MESSAGE);
        assert_eq!(state.view(), ScreenView::Loading);
    }

    #[test]
    fn success_replaces_all_fields() {
        let state = loaded(tokyo());

        assert!(!state.is_loading());
        assert!(!state.is_error());
        assert_eq!(state.location(), "Tokyo");
        assert_eq!(state.weather(), "Clear");
        assert_eq!(state.temperature(), 21.6);
        assert_eq!(state.phase(), &Phase::Success(tokyo()));
        assert_eq!(
            state.view(),
            ScreenView::Weather {
                location: "Tokyo",
                weather: "Clear",
                temperature: "22°".into(),
            }
        );
    }

    #[test]
    fn failure_keeps_previous_values() {
        let mut state = loaded(tokyo());

        let effect = state.update(Action::CitySubmit("Zzzzz".into()));
        assert!(state.is_loading());
        assert_eq!(state.location(), "Tokyo");

        let Some(Effect::LookupWeather { generation, .. }) = effect else {
            panic!("expected a lookup effect");
        };
        state.update(Action::WeatherDidFail {
            generation,
            error: "No location found for 'Zzzzz'".into(),
        });

        assert!(!state.is_loading());
        assert!(state.is_error());
        assert_eq!(state.view(), ScreenView::Error { message: ERROR_MESSAGE });
        assert_eq!(state.location(), "Tokyo");
        assert_eq!(state.weather(), "Clear");
        assert_eq!(state.temperature(), 21.6);
    }

    #[test]
    fn success_after_failure_clears_error() {
        let (mut state, _) = ScreenState::mount("Zzzzz");
        state.update(Action::WeatherDidFail {
            generation: 1,
            error: "not found".into(),
        });
        assert!(state.is_error());

        state.update(Action::CitySubmit("Tokyo".into()));
        state.update(Action::WeatherDidLoad {
            generation: 2,
            result: tokyo(),
        });

        assert!(!state.is_error());
        assert_eq!(state.location(), "Tokyo");
    }

    #[test]
    fn blank_submission_is_a_noop() {
        for blank in ["", "   ", "\t\n"] {
            let mut state = loaded(tokyo());
            let before = state.clone();

            let effect = state.update(Action::CitySubmit(blank.into()));

            assert_eq!(effect, None);
            assert_eq!(state.phase(), before.phase());
            assert_eq!(state.generation(), before.generation());
        }
    }

    #[test]
    fn submitted_city_is_trimmed() {
        let mut state = loaded(tokyo());

        let effect = state.update(Action::CitySubmit("  Oslo ".into()));

        assert_eq!(
            effect,
            Some(Effect::LookupWeather {
                city: "Oslo".into(),
                generation: 2,
            })
        );
    }

    #[test]
    fn superseded_result_is_dropped() {
        let (mut state, _) = ScreenState::mount("San Francisco");
        state.update(Action::CitySubmit("Tokyo".into()));

        // The first chain finishes after the second one started.
        state.update(Action::WeatherDidLoad {
            generation: 1,
            result: WeatherResult {
                location: "San Francisco".into(),
                weather: "Light Cloud".into(),
                temperature: 14.0,
            },
        });
        assert!(state.is_loading());
        assert_eq!(state.location(), "");

        state.update(Action::WeatherDidLoad {
            generation: 2,
            result: tokyo(),
        });
        state.update(Action::WeatherDidFail {
            generation: 1,
            error: "late".into(),
        });

        assert!(!state.is_error());
        assert_eq!(state.location(), "Tokyo");
    }

    #[test]
    fn idle_state_shows_empty_defaults() {
        let state = ScreenState::default();

        assert!(!state.is_loading());
        assert_eq!(
            state.view(),
            ScreenView::Weather {
                location: "",
                weather: "",
                temperature: "0°".into(),
            }
        );
        assert_eq!(state.backdrop(), DEFAULT_BACKDROP);
    }

    #[test]
    fn backdrop_follows_last_success() {
        let state = loaded(WeatherResult {
            location: "Bergen".into(),
            weather: "Heavy Rain".into(),
            temperature: 8.2,
        });

        assert_eq!(state.backdrop().asset, "heavy-rain.png");
    }

    #[test]
    fn temperature_rounds_half_up() {
        assert_eq!(format_temperature(21.6), "22°");
        assert_eq!(format_temperature(21.4), "21°");
        assert_eq!(format_temperature(0.5), "1°");
        assert_eq!(format_temperature(-2.5), "-2°");
        assert_eq!(format_temperature(-0.4), "0°");
    }
}
