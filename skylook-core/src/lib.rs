//! Core library for the `skylook` weather lookup tool.
//!
//! This crate defines:
//! - The OpenWeatherMap client (request construction and reply parsing)
//! - Normalization of provider payloads into [`NormalizedWeather`]
//! - The country code table, map state and search controller
//! - Configuration handling
//!
//! It is used by `skylook-cli`, but can also be reused by other front ends.

pub mod config;
pub mod country;
pub mod error;
pub mod format;
pub mod lookup;
pub mod map;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod report;

pub use config::{Config, StartView};
pub use country::CountryTable;
pub use error::WeatherError;
pub use lookup::{CountryDiscrepancy, Lookup, SearchOutcome};
pub use map::{MapState, Marker, MarkerTransition};
pub use model::{LatLong, LocationQuery, NormalizedWeather, ProviderReply, ProviderResponse};
pub use normalize::{kelvin_to_celsius, normalize};
pub use provider::OpenWeatherClient;
pub use report::Report;
