//! Interactive map session.

use anyhow::{Context, anyhow, bail};
use inquire::{InquireError, Text};
use skylook_core::{LatLong, Lookup};

use crate::output;

const HELP: &str = "\
Commands:
  search <city>[, <state>], <country>   search by name and move the marker there
  click <lat> <lng>                     drop the marker
  marker                                weather at the marker
  where                                 show map center and marker
  help                                  this text
  quit                                  leave the session";

#[derive(Debug, PartialEq)]
enum Action {
    Search {
        city: String,
        state: String,
        country: String,
    },
    Click(LatLong),
    Marker,
    Where,
    Help,
    Quit,
}

fn parse_action(line: &str) -> anyhow::Result<Action> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word.to_ascii_lowercase().as_str() {
        "search" => {
            let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [city, country] if !city.is_empty() => Ok(Action::Search {
                    city: city.to_string(),
                    state: String::new(),
                    country: country.to_string(),
                }),
                [city, state, country] if !city.is_empty() => Ok(Action::Search {
                    city: city.to_string(),
                    state: state.to_string(),
                    country: country.to_string(),
                }),
                _ => bail!("usage: search <city>[, <state>], <country>"),
            }
        }
        "click" => {
            let mut coords = rest.split_whitespace().map(str::parse::<f64>);
            match (coords.next(), coords.next(), coords.next()) {
                (Some(lat), Some(lng), None) => {
                    let lat = lat.context("latitude is not a number")?;
                    let lng = lng.context("longitude is not a number")?;
                    Ok(Action::Click(LatLong::new(lat, lng)))
                }
                _ => bail!("usage: click <lat> <lng>"),
            }
        }
        "marker" => Ok(Action::Marker),
        "where" => Ok(Action::Where),
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" => Ok(Action::Quit),
        "" => Ok(Action::Help),
        other => Err(anyhow!("unknown command '{other}', try `help`")),
    }
}

pub async fn run(mut lookup: Lookup, json: bool) -> anyhow::Result<()> {
    println!("{HELP}");

    loop {
        let line = match Text::new("skylook>").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read command"),
        };

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        // Provider errors end only the current action, not the session.
        let result = match action {
            Action::Search {
                city,
                state,
                country,
            } => match lookup.search_by_name(&city, &state, &country).await {
                Ok(outcome) => output::print_outcome(&outcome, lookup.map(), json),
                Err(err) => Err(err.into()),
            },
            Action::Click(position) => {
                let transition = lookup.click(position);
                println!(
                    "Marker #{} at {} (replaced #{})",
                    transition.added.id, transition.added.position, transition.removed.id
                );
                Ok(())
            }
            Action::Marker => match lookup.search_at_marker().await {
                Ok(outcome) => output::print_outcome(&outcome, lookup.map(), json),
                Err(err) => Err(err.into()),
            },
            Action::Where => {
                let map = lookup.map();
                println!(
                    "Center {} (zoom {}), marker #{} at {}",
                    map.center(),
                    map.zoom(),
                    map.marker().id,
                    map.marker().position
                );
                Ok(())
            }
            Action::Help => {
                println!("{HELP}");
                Ok(())
            }
            Action::Quit => break,
        };

        if let Err(err) = result {
            eprintln!("Error: {err:#}");
        }
    }

    Ok(())
}
