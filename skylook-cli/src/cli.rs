use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use skylook_core::{Config, CountryTable, LatLong, Lookup, provider::openweather::DEFAULT_ENDPOINT};

use crate::{output, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skylook", version, about = "Current weather by place name or map position")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// OpenWeatherMap API key; overrides the config file.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider root URL; overrides the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Print the normalized record as JSON instead of the text report.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key (and optionally a custom endpoint).
    Configure,

    /// Show weather for a city.
    Search {
        /// City name.
        city: String,

        /// State code, e.g. "OR". Mostly useful for the United States.
        #[arg(long, default_value = "")]
        state: String,

        /// Country display name, see `skylook countries`.
        #[arg(long)]
        country: String,
    },

    /// Drop the marker at a coordinate pair and show the weather there.
    At {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// List the country names accepted by `search --country`.
    Countries,

    /// Interactive session keeping one map and marker across searches.
    Session,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { global, command } = self;

        match command {
            Command::Configure => configure(),
            Command::Countries => {
                for (code, name) in CountryTable::global().iter() {
                    println!("{code}  {name}");
                }
                Ok(())
            }
            Command::Search {
                city,
                state,
                country,
            } => {
                let mut lookup = build_lookup(&global)?;
                let outcome = lookup.search_by_name(&city, &state, &country).await?;
                output::print_outcome(&outcome, lookup.map(), global.json)
            }
            Command::At { lat, lng } => {
                let mut lookup = build_lookup(&global)?;
                let outcome = lookup.search_at(LatLong::new(lat, lng)).await?;
                output::print_outcome(&outcome, lookup.map(), global.json)
            }
            Command::Session => {
                let lookup = build_lookup(&global)?;
                session::run(lookup, global.json).await
            }
        }
    }
}

fn build_lookup(global: &GlobalArgs) -> anyhow::Result<Lookup> {
    let config = Config::load()?.with_overrides(global.api_key.clone(), global.endpoint.clone());
    Ok(Lookup::from_config(&config)?)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let endpoint = Text::new("Provider endpoint:")
        .with_default(config.endpoint())
        .prompt()
        .context("Failed to read endpoint")?;

    config.set_api_key(api_key.trim().to_string());
    config.endpoint = (endpoint.trim() != DEFAULT_ENDPOINT).then(|| endpoint.trim().to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_command() {
        let cli = Cli::try_parse_from([
            "skylook",
            "search",
            "Portland",
            "--state",
            "OR",
            "--country",
            "United States",
        ])
        .unwrap();

        match cli.command {
            Command::Search {
                city,
                state,
                country,
            } => {
                assert_eq!(city, "Portland");
                assert_eq!(state, "OR");
                assert_eq!(country, "United States");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["skylook", "at", "-33.87", "-151.2"]).unwrap();

        assert!(matches!(cli.command, Command::At { lat, lng } if lat == -33.87 && lng == -151.2));
    }

    #[test]
    fn search_requires_country() {
        assert!(Cli::try_parse_from(["skylook", "search", "London"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["skylook", "countries", "--json"]).unwrap();
        assert!(cli.global.json);
    }
}
