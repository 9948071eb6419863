#![forbid(unsafe_code)]
#![warn(clippy::cargo, clippy::suspicious, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions)]

mod errors;
mod model;
mod server;
mod services;
mod settings;
pub mod tracing;

pub use errors::WeatherError;
pub use model::{Condition, MainReadings, Sys, WeatherQuery, WeatherResult, Wind};
pub use server::Server;
pub use services::{
    lookup_current_weather, CurrentWeatherApi, OpenWeatherApi, WeatherApiError, WeatherApiRef,
};
pub use settings::{load_dotenv, CliOptions, HttpApiSettings, HttpServerSettings, Settings, WeatherProviderSettings};
