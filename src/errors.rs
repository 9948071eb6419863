use crate::services::WeatherApiError;
use reqwest::StatusCode;
use thiserror::Error;

/// Outcome of a weather lookup that did not produce a projection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WeatherError {
    #[error("Missing city or API key")]
    MissingCityOrApiKey,

    /// Any upstream status other than 200, including provider outages.
    #[error("City not found")]
    CityNotFound { upstream_status: StatusCode },

    #[error("Something went wrong")]
    Provider(#[source] WeatherApiError),
}

impl From<WeatherApiError> for WeatherError {
    fn from(error: WeatherApiError) -> Self {
        match error {
            WeatherApiError::Rejected(upstream_status) => Self::CityNotFound { upstream_status },
            error => Self::Provider(error),
        }
    }
}
