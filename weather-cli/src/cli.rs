use std::{io, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use inquire::{Select, Text};
use ratatui::{Terminal, backend::CrosstermBackend};
use weather_core::{
    Config, ProviderId, WeatherProvider, image_for, lookup_weather,
    provider::provider_from_config, screen::format_temperature,
};

use crate::{
    app::App,
    logging::{self, LogTarget},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up the current weather for any city")]
pub struct Cli {
    /// City looked up when the screen opens (defaults to the configured city).
    #[arg(long, short)]
    pub city: Option<String>,

    /// Provider short name, e.g. "openmeteo" or "metaweather".
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the default provider and city.
    Configure,

    /// Print the current weather for a city and exit.
    Show {
        /// City name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            None => {
                logging::init(self.verbose, LogTarget::File)?;
                let provider = build_provider(&config, self.provider.as_deref())?;
                let city = startup_city(self.city, &config);
                run_screen(provider, &city).await
            }
            Some(Command::Show { city }) => {
                logging::init(self.verbose, LogTarget::Stderr)?;
                let provider = build_provider(&config, self.provider.as_deref())?;
                show(provider.as_ref(), &city).await
            }
            Some(Command::Configure) => {
                logging::init(self.verbose, LogTarget::Stderr)?;
                configure(config)
            }
        }
    }
}

/// A blank `--city` would leave the screen idle, so it falls back like a blank config entry.
fn startup_city(requested: Option<String>, config: &Config) -> String {
    requested
        .filter(|city| !city.trim().is_empty())
        .unwrap_or_else(|| config.default_city().to_string())
}

fn build_provider(config: &Config, requested: Option<&str>) -> Result<Arc<dyn WeatherProvider>> {
    let id = match requested {
        Some(name) => ProviderId::try_from(name)?,
        None => config.default_provider_id()?,
    };

    Ok(Arc::from(provider_from_config(id, config)?))
}

async fn run_screen(provider: Arc<dyn WeatherProvider>, city: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = App::mount(provider, city).run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn show(provider: &dyn WeatherProvider, city: &str) -> Result<()> {
    let weather = lookup_weather(provider, city)
        .await
        .with_context(|| format!("Could not load weather for '{city}'"))?;
    let backdrop = image_for(Some(weather.weather.as_str()));

    println!("{}", weather.location);
    println!("{}", weather.weather);
    println!("{}", format_temperature(weather.temperature));
    println!("backdrop: {}", backdrop.asset);

    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    let current = config.default_provider_id()?;
    let providers = ProviderId::all().to_vec();
    let start = providers.iter().position(|id| *id == current).unwrap_or(0);

    let provider = Select::new("Default provider:", providers)
        .with_starting_cursor(start)
        .prompt()
        .context("Provider selection cancelled")?;

    let current_city = config.default_city().to_string();
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()
        .context("City input cancelled")?;

    config.set_default_provider(provider);
    config.set_default_city(city.trim());
    config.save()?;

    println!(
        "Saved provider '{provider}' and city '{}' to {}",
        config.default_city(),
        Config::config_file_path()?.display()
    );

    Ok(())
}
