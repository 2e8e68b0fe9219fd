//! Search flow shared by every front end: query, check, normalize, move the map.

use std::fmt;

use tracing::info;

use crate::{
    Config,
    country::CountryTable,
    error::WeatherError,
    map::{MapState, MarkerTransition},
    model::{LatLong, LocationQuery, NormalizedWeather, ProviderReply},
    normalize::normalize,
    provider::{OpenWeatherClient, client_from_config},
};

/// The provider resolved a name search to a different country than requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDiscrepancy {
    pub city_name: String,
    pub requested: String,
    pub resolved: String,
}

impl fmt::Display for CountryDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No city with the name {} found in {}, but we found one in {}!",
            self.city_name, self.requested, self.resolved
        )
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found {
        weather: NormalizedWeather,
        discrepancy: Option<CountryDiscrepancy>,
        /// Set when the search moved the marker.
        transition: Option<MarkerTransition>,
    },
    NotFound {
        message: String,
    },
    Rejected {
        code: String,
        message: String,
    },
}

/// Owns the provider client and the map; actions run one at a time.
#[derive(Debug)]
pub struct Lookup {
    client: OpenWeatherClient,
    countries: &'static CountryTable,
    map: MapState,
}

impl Lookup {
    pub fn new(client: OpenWeatherClient, map: MapState) -> Self {
        Self {
            client,
            countries: CountryTable::global(),
            map,
        }
    }

    /// Client and start view from config.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let client = client_from_config(config)?;
        let start = config.start_view();
        Ok(Self::new(client, MapState::new(start.center(), start.zoom)))
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn click(&mut self, position: LatLong) -> MarkerTransition {
        self.map.click(position)
    }

    /// Search by place name. On success the map flies to the result and the
    /// marker is moved there; a not-found reply leaves the map alone.
    pub async fn search_by_name(
        &mut self,
        city_name: &str,
        state_code: &str,
        country_name: &str,
    ) -> Result<SearchOutcome, WeatherError> {
        let query = LocationQuery::by_name(city_name, state_code, country_name);
        let weather = match self.client.fetch(&query).await? {
            ProviderReply::Weather(response) => normalize(&response, self.countries)?,
            ProviderReply::NotFound { message } => return Ok(SearchOutcome::NotFound { message }),
            ProviderReply::Rejected { code, message } => {
                return Ok(SearchOutcome::Rejected { code, message });
            }
        };

        self.map.fly_to(weather.lat_long);
        let transition = self.map.place_marker(weather.lat_long);
        let discrepancy = self.discrepancy(country_name, &weather);
        info!(city = %weather.city_name, country = weather.country_label(), "name search resolved");

        Ok(SearchOutcome::Found {
            weather,
            discrepancy,
            transition: Some(transition),
        })
    }

    /// Search at the current marker position. The map flies to the marker
    /// only when the provider returned weather for it.
    pub async fn search_at_marker(&mut self) -> Result<SearchOutcome, WeatherError> {
        let position = self.map.marker().position;
        let reply = self
            .client
            .fetch(&LocationQuery::by_coordinates(position))
            .await?;

        let weather = match reply {
            ProviderReply::Weather(response) => normalize(&response, self.countries)?,
            ProviderReply::NotFound { message } => return Ok(SearchOutcome::NotFound { message }),
            ProviderReply::Rejected { code, message } => {
                return Ok(SearchOutcome::Rejected { code, message });
            }
        };
        self.map.fly_to(position);
        info!(%position, city = %weather.city_name, "marker search resolved");

        Ok(SearchOutcome::Found {
            weather,
            discrepancy: None,
            transition: None,
        })
    }

    /// Drop the marker at `position` and search there.
    pub async fn search_at(&mut self, position: LatLong) -> Result<SearchOutcome, WeatherError> {
        let transition = self.click(position);
        let mut outcome = self.search_at_marker().await?;
        if let SearchOutcome::Found { transition: moved, .. } = &mut outcome {
            *moved = Some(transition);
        }
        Ok(outcome)
    }

    fn discrepancy(&self, requested: &str, weather: &NormalizedWeather) -> Option<CountryDiscrepancy> {
        let requested_code = self.countries.code_for(requested);
        let resolved_code = weather.country_code.as_deref();

        let same = match (requested_code, resolved_code) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        };
        if same {
            return None;
        }

        Some(CountryDiscrepancy {
            city_name: weather.city_name.clone(),
            requested: requested.to_string(),
            resolved: weather.country_label().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrepancy_message_names_both_countries() {
        let d = CountryDiscrepancy {
            city_name: "Paris".into(),
            requested: "United Kingdom".into(),
            resolved: "France".into(),
        };

        assert_eq!(
            d.to_string(),
            "No city with the name Paris found in United Kingdom, but we found one in France!"
        );
    }
}
