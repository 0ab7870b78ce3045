use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text, validator::Validation};
use weather_dashboard_core::{
    Config, Dashboard, FilePreferenceStore, Notification, dashboard::Command as DashboardCommand,
    provider_from_config,
};

use crate::render;

/// Typing this at the prompt leaves the dashboard.
const QUIT: &str = ":q";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Current weather for any city")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Without a subcommand the interactive dashboard starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Alternate provider host, e.g. a caching proxy.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show current weather for a city and exit.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure { base_url }) => configure(base_url),
            Some(Command::Show { city }) => show(&city).await,
            None => interactive().await,
        }
    }
}

fn build_dashboard() -> anyhow::Result<Dashboard> {
    let config = Config::load()?;
    let provider = Arc::new(provider_from_config(&config));
    let prefs = FilePreferenceStore::at_default_location()?;
    tracing::debug!(prefs = %prefs.path().display(), "dashboard ready");
    Ok(Dashboard::new(config.credential(), provider, prefs))
}

fn configure(base_url: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("API key cannot be empty".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    if let Some(url) = base_url {
        config.base_url = Some(url);
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let mut dash = build_dashboard()?;

    if let Some(notice) = dash.setup_notice() {
        eprint!("{}", render::setup_notice(&notice));
    }

    let notification = dash
        .fetch(city)
        .await
        .ok_or_else(|| anyhow!("Search for {city} was superseded"))?;

    match dash.view() {
        Some(view) => {
            print!("{}", render::weather_card(&view));
            Ok(())
        }
        None => Err(anyhow!(notification.description)),
    }
}

async fn interactive() -> anyhow::Result<()> {
    let mut dash = build_dashboard()?;

    println!("{}", render::header());
    if let Some(notice) = dash.setup_notice() {
        println!("{}", render::setup_notice(&notice));
    }

    if let Some(n) = dash.mount().await {
        show_outcome(&dash, &n);
    }

    loop {
        let input = Text::new("Search city:")
            .with_placeholder("Enter city name...")
            .with_initial_value(dash.query())
            .with_help_message("Enter to search, :q or Esc to quit")
            .prompt();

        let query = match input {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => {
                return Err(anyhow::Error::new(err).context("Failed to read search input"));
            }
        };
        if query.trim() == QUIT {
            break;
        }

        dash.dispatch(DashboardCommand::EditQuery(query)).await;
        if let Some(n) = submit(&mut dash).await {
            show_outcome(&dash, &n);
        }
    }

    Ok(())
}

/// Same as `Command::Submit`, but reports the loading state while waiting.
async fn submit(dash: &mut Dashboard) -> Option<Notification> {
    let query = dash.query().to_string();
    match dash.begin_fetch(&query) {
        Ok(pending) => {
            if dash.is_loading() {
                println!("{}", render::loading(pending.city().as_str()));
            }
            let outcome = pending.run().await;
            dash.finish_fetch(outcome)
        }
        Err(n) => Some(n),
    }
}

fn show_outcome(dash: &Dashboard, n: &Notification) {
    if n.is_error() {
        eprintln!("{}", render::notification(n));
    } else {
        println!("{}", render::notification(n));
    }
    if let Some(view) = dash.view() {
        println!();
        println!("{}", render::weather_card(&view));
    }
}
