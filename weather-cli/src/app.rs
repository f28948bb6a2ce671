//! Weather screen controller
//!
//! Owns the `ScreenState`, turns key presses into actions and runs the
//! lookup effects on spawned tasks. Results come back through a channel and
//! are applied on the controller's own task, so the state has one writer.

use std::{sync::Arc, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tracing::{debug, info};
use weather_core::{Action, Effect, ScreenState, WeatherProvider, lookup_weather};

use crate::{
    search_input::{PLACEHOLDER, SearchInput},
    ui,
};

const TICK: Duration = Duration::from_millis(120);
const POLL_SLEEP: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    state: ScreenState,
    search: SearchInput<Action>,
    provider: Arc<dyn WeatherProvider>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    tick: usize,
}

impl App {
    /// Mount the screen: the lookup for `default_city` starts immediately.
    pub fn mount(provider: Arc<dyn WeatherProvider>, default_city: &str) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (state, effect) = ScreenState::mount(default_city);

        let app = Self {
            state,
            search: SearchInput::new(PLACEHOLDER, Action::CitySubmit),
            provider,
            action_tx,
            action_rx,
            tick: 0,
        };

        if let Some(effect) = effect {
            app.run_effect(effect);
        }
        app
    }

    pub fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.state.update(action) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::LookupWeather { city, generation } => {
                let provider = Arc::clone(&self.provider);
                let tx = self.action_tx.clone();

                tokio::spawn(async move {
                    let action = match lookup_weather(provider.as_ref(), &city).await {
                        Ok(result) => Action::WeatherDidLoad { generation, result },
                        Err(e) => Action::WeatherDidFail {
                            generation,
                            error: e.to_string(),
                        },
                    };

                    // Receiver is gone once the screen has closed.
                    let _ = tx.send(action);
                });
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        let quit = key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'));
        if quit {
            return Flow::Quit;
        }

        if let Some(action) = self.search.handle_key(key) {
            self.dispatch(action);
        }
        Flow::Continue
    }

    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let poller = spawn_event_poller(event_tx);
        let mut ticker = tokio::time::interval(TICK);

        info!("weather screen started");

        loop {
            terminal.draw(|frame| ui::render(frame, &self.state, &self.search, self.tick))?;

            tokio::select! {
                Some(event) = event_rx.recv() => {
                    if let Event::Key(key) = event {
                        if self.handle_key(key) == Flow::Quit {
                            break;
                        }
                    }
                }
                Some(action) = self.action_rx.recv() => self.dispatch(action),
                _ = ticker.tick() => self.tick = self.tick.wrapping_add(1),
            }
        }

        poller.abort();
        info!("weather screen closed");
        Ok(())
    }
}

/// Forward terminal events to the controller until it stops listening.
fn spawn_event_poller(tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(POLL_SLEEP).await;

            while event::poll(Duration::ZERO).unwrap_or(false) {
                let Ok(evt) = event::read() else {
                    continue;
                };
                if tx.send(evt).is_err() {
                    debug!("event channel closed, stopping poller");
                    return;
                }
            }
        }
    })
}
