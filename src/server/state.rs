use super::errors::ApiError;
use crate::services::{OpenWeatherApi, WeatherApiRef};
use crate::settings::WeatherProviderSettings;
use axum::extract::FromRef;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;

/// Provider credential as configured at startup, possibly absent.
#[derive(Clone)]
pub struct ProviderCredential(Option<SecretString>);

impl ProviderCredential {
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self(api_key)
    }

    pub const fn get(&self) -> Option<&SecretString> {
        self.0.as_ref()
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.is_some() { "configured" } else { "missing" };
        f.debug_tuple("ProviderCredential").field(&state).finish()
    }
}

#[tracing::instrument(level = "trace")]
pub fn initialize_app_state(settings: &WeatherProviderSettings) -> Result<AppState, ApiError> {
    let weather_api: WeatherApiRef = Arc::new(OpenWeatherApi::new(settings)?);
    let credential = ProviderCredential::new(settings.api_key.clone());
    Ok(AppState { weather_api, credential })
}

#[derive(Clone)]
pub struct AppState {
    pub weather_api: WeatherApiRef,
    pub credential: ProviderCredential,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").field("credential", &self.credential).finish()
    }
}

impl FromRef<AppState> for WeatherApiRef {
    fn from_ref(app: &AppState) -> Self {
        app.weather_api.clone()
    }
}

impl FromRef<AppState> for ProviderCredential {
    fn from_ref(app: &AppState) -> Self {
        app.credential.clone()
    }
}
