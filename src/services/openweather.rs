use super::{CurrentWeatherApi, WeatherApiError};
use crate::model::{Condition, MainReadings, Sys, WeatherQuery, WeatherResult, Wind};
use crate::settings::WeatherProviderSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Number;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

const CURRENT_WEATHER_PATH: &str = "weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherApi {
    client: reqwest::Client,
    base_url: Url,
    units: String,
}

impl OpenWeatherApi {
    pub fn new(settings: &WeatherProviderSettings) -> Result<Self, WeatherApiError> {
        let base_url = settings.base_url.clone();
        if base_url.cannot_be_a_base() {
            return Err(WeatherApiError::NotABaseUrl(base_url));
        }

        let client = Self::make_http_client(settings.timeout)?;

        Ok(Self { client, base_url, units: settings.units.clone() })
    }

    fn make_http_client(timeout: Duration) -> Result<reqwest::Client, WeatherApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(60))
            .default_headers(headers)
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(client)
    }

    fn current_weather_url(&self) -> Result<Url, WeatherApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WeatherApiError::NotABaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(CURRENT_WEATHER_PATH);
        Ok(url)
    }
}

#[async_trait]
impl CurrentWeatherApi for OpenWeatherApi {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherApiError> {
        const LABEL: &str = "current_weather";

        let endpoint = self.current_weather_url()?;
        let span = tracing::debug_span!("get_current_weather", city = %query.city);

        async {
            // reqwest errors render their url, and the url carries the api key
            let response = self
                .client
                .get(endpoint.clone())
                .query(&[
                    ("q", query.city.as_str()),
                    ("appid", query.api_key.expose_secret().as_str()),
                    ("units", self.units.as_str()),
                ])
                .send()
                .await
                .map_err(reqwest::Error::without_url)?;

            let status = response.status();
            log_response(LABEL, &endpoint, status);
            if status != StatusCode::OK {
                return Err(WeatherApiError::Rejected(status));
            }

            let body = response.text().await.map_err(reqwest::Error::without_url)?;
            tracing::debug!(%body, "{LABEL} response body");

            let payload: CurrentWeatherPayload = serde_json::from_str(&body)?;
            payload.into_projection()
        }
        .instrument(span)
        .await
    }
}

fn log_response(label: &str, endpoint: &Url, status: StatusCode) {
    const MESSAGE: &str = "response recd from weather provider";
    if status.is_success() || status.is_informational() {
        tracing::debug!(%endpoint, %status, "{label}: {MESSAGE}");
    } else if status.is_client_error() {
        tracing::warn!(%endpoint, %status, "{label}: {MESSAGE}");
    } else {
        tracing::error!(%endpoint, %status, "{label}: {MESSAGE}");
    }
}

/// Provider current-conditions document, limited to the fields the projection needs. Every
/// field is required.
#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    name: String,
    sys: Sys,
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
    visibility: Number,
}

impl CurrentWeatherPayload {
    fn into_projection(self) -> Result<WeatherResult, WeatherApiError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherApiError::MissingField("weather[0]"))?;

        Ok(WeatherResult {
            name: self.name,
            sys: self.sys,
            main: self.main,
            weather: [condition],
            wind: self.wind,
            visibility: self.visibility,
        })
    }
}
