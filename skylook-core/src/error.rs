use reqwest::StatusCode;

/// Errors raised while talking to the weather provider or interpreting its replies.
///
/// A provider "not found" payload is not an error; it comes back as
/// [`ProviderReply::NotFound`](crate::model::ProviderReply::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("Invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(
        "No API key configured.\n\
         Hint: run `skylook configure` or pass --api-key / set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Malformed(err.to_string())
    }
}
