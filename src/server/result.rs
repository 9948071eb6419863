use crate::errors::WeatherError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorReport {
    #[schema(example = "Something went wrong")]
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorReport {
    fn from_error(error: &WeatherError) -> Self {
        Self { error: error.to_string(), details: None }
    }

    fn with_details(error: &WeatherError, details: String) -> Self {
        Self { error: error.to_string(), details: Some(details) }
    }
}

#[derive(Debug, Clone)]
pub enum HttpError {
    BadRequest { error: ErrorReport },
    NotFound { error: ErrorReport },
    Internal { error: ErrorReport },
}

impl From<WeatherError> for HttpError {
    fn from(error: WeatherError) -> Self {
        match &error {
            WeatherError::MissingCityOrApiKey => {
                tracing::warn!("HTTP handler rejected request: {error}");
                Self::BadRequest { error: ErrorReport::from_error(&error) }
            },

            WeatherError::CityNotFound { upstream_status } => {
                tracing::warn!(%upstream_status, "HTTP handler error: {error}");
                Self::NotFound { error: ErrorReport::from_error(&error) }
            },

            WeatherError::Provider(source) => {
                let details = render_cause_chain(source);
                tracing::error!(%details, "HTTP handler error: {error}");
                Self::Internal { error: ErrorReport::with_details(&error, details) }
            },
        }
    }
}

/// Joins an error with its sources, skipping causes whose text the rendering already includes.
fn render_cause_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest { error } => (StatusCode::BAD_REQUEST, Json(error)).into_response(),
            Self::NotFound { error } => (StatusCode::NOT_FOUND, Json(error)).into_response(),
            Self::Internal { error } => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
