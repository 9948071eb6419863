use crate::services::WeatherApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("HTTP engine error: {0}")]
    HttpEngine(#[from] hyper::Error),

    #[error("failed joining with thread: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid allowed origin {origin:?}: {source}")]
    AllowedOrigin {
        origin: String,
        source: axum::http::header::InvalidHeaderValue,
    },

    #[error("failed to initialize weather provider client: {0}")]
    WeatherApi(#[from] WeatherApiError),
}
