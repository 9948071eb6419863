mod openweather;

pub use openweather::OpenWeatherApi;

use crate::errors::WeatherError;
use crate::model::{WeatherQuery, WeatherResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[async_trait]
pub trait CurrentWeatherApi: Send + Sync {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherApiError>;
}

pub type WeatherApiRef = Arc<dyn CurrentWeatherApi>;

#[derive(Debug, Error)]
pub enum WeatherApiError {
    #[error("supplied Weather API url is not a base url to query: {0}")]
    NotABaseUrl(Url),

    #[error("Weather API rejected query with status: {0}")]
    Rejected(StatusCode),

    #[error("Weather API call failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("failed to parse Weather API JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Weather API response is missing expected field: {0}")]
    MissingField(&'static str),
}

/// Validates the request inputs and, only when both are present, asks the provider for current
/// conditions in `city`.
#[tracing::instrument(level = "debug", skip(api, api_key))]
pub async fn lookup_current_weather(
    api: &dyn CurrentWeatherApi, city: Option<String>, api_key: Option<&SecretString>,
) -> Result<WeatherResult, WeatherError> {
    let query = WeatherQuery::new(city, api_key)?;
    let result = api.current_weather(&query).await?;
    Ok(result)
}
