use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{
    country::CountryTable,
    error::WeatherError,
    model::{LocationQuery, ProviderReply, ProviderResponse},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "data/2.5/weather";

/// Client for the OpenWeatherMap current-weather endpoint.
///
/// One call per lookup: no retry, no timeout, no caching.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: Url,
    countries: &'static CountryTable,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// `endpoint` is the provider root, e.g. `https://api.openweathermap.org`.
    pub fn with_endpoint(api_key: String, endpoint: &str) -> Result<Self, WeatherError> {
        let mut root = endpoint.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let endpoint = Url::parse(&root)?.join(CURRENT_WEATHER_PATH)?;

        Ok(Self {
            api_key,
            endpoint,
            countries: CountryTable::global(),
            http: Client::new(),
        })
    }

    /// Build the full request URL for `query`.
    ///
    /// A country name missing from the table is sent as typed; the provider
    /// answers with its own not-found payload.
    pub fn request_url(&self, query: &LocationQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                LocationQuery::ByName {
                    city_name,
                    state_code,
                    country_name,
                } => {
                    let country_name = country_name.trim();
                    let country = match self.countries.code_for(country_name) {
                        Some(code) => code,
                        None => {
                            warn!(country = %country_name, "country name not in lookup table");
                            country_name
                        }
                    };
                    pairs.append_pair("q", &format!("{city_name},{state_code},{country}"));
                }
                LocationQuery::ByCoordinates(position) => {
                    pairs
                        .append_pair("lat", &position.lat.to_string())
                        .append_pair("lon", &position.lng.to_string());
                }
            }
            pairs.append_pair("appid", &self.api_key);
        }
        url
    }

    /// Send `query` to the provider.
    ///
    /// Error-shaped payloads (`cod` other than 200) are returned as replies,
    /// whatever the HTTP status.
    pub async fn fetch(&self, query: &LocationQuery) -> Result<ProviderReply, WeatherError> {
        let url = self.request_url(query);
        debug!(url = %redact(&url), "querying weather provider");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        let reply = parse_reply(status, &body)?;
        match &reply {
            ProviderReply::Weather(weather) => {
                debug!(city = %weather.name, "provider returned weather")
            }
            ProviderReply::NotFound { message } => debug!(%message, "provider reported not found"),
            ProviderReply::Rejected { code, message } => {
                warn!(%code, %message, "provider rejected request")
            }
        }
        Ok(reply)
    }
}

fn parse_reply(status: StatusCode, body: &str) -> Result<ProviderReply, WeatherError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) if status.is_success() => return Err(err.into()),
        Err(_) => {
            return Err(WeatherError::Status {
                status,
                body: truncate_body(body),
            });
        }
    };

    if let Some(reply) = error_payload(&value) {
        return Ok(reply);
    }

    if !status.is_success() {
        return Err(WeatherError::Status {
            status,
            body: truncate_body(body),
        });
    }

    let response: ProviderResponse = serde_json::from_value(value)?;
    Ok(ProviderReply::Weather(Box::new(response)))
}

/// The provider reports `cod` as a number on success and usually as a string on errors.
fn error_payload(value: &Value) -> Option<ProviderReply> {
    let code = match value.get("cod")? {
        Value::String(code) => code.clone(),
        Value::Number(code) => code.to_string(),
        _ => return None,
    };
    if code == "200" {
        return None;
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(if code == "404" {
        ProviderReply::NotFound { message }
    } else {
        ProviderReply::Rejected { code, message }
    })
}

fn redact(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatLong;

    fn client() -> OpenWeatherClient {
        OpenWeatherClient::new("KEY".into()).unwrap()
    }

    fn query_of(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn builds_url_by_name() {
        let url = client().request_url(&LocationQuery::by_name("London", "", "United Kingdom"));

        assert_eq!(url.path(), "/data/2.5/weather");
        assert_eq!(query_of(&url, "q").as_deref(), Some("London,,GB"));
        assert_eq!(query_of(&url, "appid").as_deref(), Some("KEY"));
    }

    #[test]
    fn builds_url_with_state_code() {
        let url = client().request_url(&LocationQuery::by_name("Portland", "OR", "United States"));
        assert_eq!(query_of(&url, "q").as_deref(), Some("Portland,OR,US"));
    }

    #[test]
    fn unknown_country_is_passed_through() {
        let url = client().request_url(&LocationQuery::by_name("Springfield", "", "Atlantis"));
        assert_eq!(query_of(&url, "q").as_deref(), Some("Springfield,,Atlantis"));
    }

    #[test]
    fn unknown_country_is_trimmed_before_sending() {
        let url = client().request_url(&LocationQuery::by_name("Springfield", "", "  Atlantis "));
        assert_eq!(query_of(&url, "q").as_deref(), Some("Springfield,,Atlantis"));
    }

    #[test]
    fn builds_url_by_coordinates_without_validation() {
        let url = client().request_url(&LocationQuery::by_coordinates(LatLong::new(123.5, -0.09)));

        assert_eq!(query_of(&url, "lat").as_deref(), Some("123.5"));
        assert_eq!(query_of(&url, "lon").as_deref(), Some("-0.09"));
        assert_eq!(query_of(&url, "q"), None);
    }

    #[test]
    fn endpoint_with_path_prefix_is_kept() {
        let client = OpenWeatherClient::with_endpoint("KEY".into(), "http://localhost:8080/proxy").unwrap();
        let url = client.request_url(&LocationQuery::by_coordinates(LatLong::new(1.0, 2.0)));

        assert_eq!(url.path(), "/proxy/data/2.5/weather");
    }

    #[test]
    fn not_found_payload_is_a_reply() {
        let reply = parse_reply(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
        )
        .unwrap();

        assert!(matches!(reply, ProviderReply::NotFound { message } if message == "city not found"));
    }

    #[test]
    fn numeric_error_code_is_rejected() {
        let reply = parse_reply(
            StatusCode::UNAUTHORIZED,
            r#"{"cod":401,"message":"Invalid API key."}"#,
        )
        .unwrap();

        assert!(matches!(reply, ProviderReply::Rejected { code, .. } if code == "401"));
    }

    #[test]
    fn non_json_error_body_is_a_status_error() {
        let err = parse_reply(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, WeatherError::Status { status, .. } if status == StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn garbage_success_body_is_malformed() {
        let err = parse_reply(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[test]
    fn redact_hides_api_key() {
        let url = client().request_url(&LocationQuery::by_name("Paris", "", "France"));
        let shown = redact(&url).to_string();

        assert!(!shown.contains("KEY"));
        assert!(shown.contains("appid=***"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
