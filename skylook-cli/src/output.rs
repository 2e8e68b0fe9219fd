use skylook_core::{MapState, Report, SearchOutcome, map::TILE_ATTRIBUTION, report::summary_line};
use tracing::debug;

/// Print a search result. Not-found and rejected replies go to stderr.
pub fn print_outcome(outcome: &SearchOutcome, map: &MapState, json: bool) -> anyhow::Result<()> {
    match outcome {
        SearchOutcome::Found {
            weather,
            discrepancy,
            ..
        } => {
            debug!("{}", summary_line(weather));
            if let Some(discrepancy) = discrepancy {
                eprintln!("{discrepancy}");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(weather)?);
            } else {
                print!("{}", Report::new(weather));
                println!();
                println!("Map: {} ({TILE_ATTRIBUTION})", map.osm_link());
            }
        }
        SearchOutcome::NotFound { message } => {
            eprintln!("Location not found: {message}");
        }
        SearchOutcome::Rejected { code, message } => {
            eprintln!("Weather provider rejected the request ({code}): {message}");
        }
    }

    Ok(())
}
