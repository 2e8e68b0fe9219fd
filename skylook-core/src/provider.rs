use crate::{Config, error::WeatherError};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Construct the provider client from config.
pub fn client_from_config(config: &Config) -> Result<OpenWeatherClient, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;
    OpenWeatherClient::with_endpoint(api_key.to_owned(), config.endpoint())
}
