use super::result::{ErrorReport, HttpError};
use super::state::{AppState, ProviderCredential};
use crate::model::{Condition, MainReadings, Sys, WeatherResult, Wind};
use crate::services::{self, WeatherApiRef};
use axum::extract::{RawQuery, State};
use axum::{routing, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(serve_weather),
    components(schemas(WeatherResult, Sys, MainReadings, Condition, Wind, ErrorReport)),
    tags((name = "weather", description = "Current weather conditions by city")),
)]
pub struct WeatherApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route("/weather", routing::get(serve_weather))
}

#[utoipa::path(
    get,
    path = "/weather",
    tag = "weather",
    params(
        ("city" = Option<String>, Query, description = "City name as understood by the weather provider, e.g. `London` or `London,GB`; only the first value is used"),
    ),
    responses(
(status = 200, description = "Current conditions for the city", body = WeatherResult),
(status = 400, description = "Missing city or API key", body = ErrorReport),
(status = 404, description = "Provider answered with any status other than 200", body = ErrorReport),
(status = 500, description = "Provider unreachable or its response is unusable", body = ErrorReport),
    ),
)]
#[axum::debug_handler(state = AppState)]
#[tracing::instrument(level = "debug", skip(weather_api, credential))]
async fn serve_weather(
    State(weather_api): State<WeatherApiRef>, State(credential): State<ProviderCredential>,
    RawQuery(query): RawQuery,
) -> Result<Json<WeatherResult>, HttpError> {
    let city = query.as_deref().and_then(city_param);

    let result =
        services::lookup_current_weather(&*weather_api, city, credential.get()).await?;

    Ok(Json(result))
}

/// First `city` value in the query string. Later repeats of the key are ignored.
fn city_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "city")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_city_param() {
        let cases = [
            ("city=London", Some("London")),
            ("city=London&city=Paris", Some("London")),
            ("units=imperial&city=Paris", Some("Paris")),
            ("city=S%C3%A3o+Paulo%2CBR", Some("São Paulo,BR")),
            ("city=", Some("")),
            ("city", Some("")),
            ("town=London", None),
            ("", None),
        ];

        for (query, expected) in cases {
            assert_eq!(city_param(query).as_deref(), expected, "query: {query:?}");
        }
    }
}
