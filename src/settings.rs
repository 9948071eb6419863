use anyhow::Context;
use clap::Parser;
use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_WEATHER_UNITS: &str = "metric";
const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

const ENV_PREFIX: &str = "APP";
const ENV_API_KEY: &str = "WEATHER_API_KEY";

/// Weather proxy HTTP service.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Explicit configuration file; format is inferred from the file extension.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Configuration file holding secrets, such as `weather.api_key`.
    #[arg(short, long, value_name = "PATH")]
    pub secrets: Option<PathBuf>,

    /// Overrides the HTTP port the API listens on.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Dotenv file to load instead of searching for `.env` from the working directory up.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

impl CliOptions {
    pub const fn env_api_key() -> &'static str {
        ENV_API_KEY
    }
}

/// Loads a dotenv file into the process environment. Variables already set in the environment
/// keep their values. A missing file is not an error; the real environment is used as is.
pub fn load_dotenv(env_file: Option<&Path>) -> Option<PathBuf> {
    let outcome = match env_file {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match outcome {
        Ok(path) => {
            tracing::info!(path = %path.display(), "loaded environment from dotenv file");
            Some(path)
        },
        Err(error) if error.not_found() => {
            tracing::debug!("no dotenv file found; using the process environment only");
            None
        },
        Err(error) => {
            tracing::warn!(%error, "failed to load dotenv file; using the process environment only");
            None
        },
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http_api: HttpApiSettings,
    pub weather: WeatherProviderSettings,
}

impl Settings {
    /// Layers built-in defaults, the optional configuration and secrets files, `APP_` prefixed
    /// environment variables, `WEATHER_API_KEY` and finally command line overrides.
    pub fn load(options: &CliOptions) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("http_api.server.host", DEFAULT_HOST)?
            .set_default("http_api.server.port", i64::from(DEFAULT_PORT))?
            .set_default("http_api.timeout_secs", DEFAULT_API_TIMEOUT_SECS)?
            .set_default("http_api.allowed_origins", vec![DEFAULT_ALLOWED_ORIGIN])?
            .set_default("weather.base_url", DEFAULT_WEATHER_BASE_URL)?
            .set_default("weather.units", DEFAULT_WEATHER_UNITS)?
            .set_default("weather.timeout_secs", DEFAULT_WEATHER_TIMEOUT_SECS)?;

        if let Some(config_path) = &options.config {
            builder = builder.add_source(File::from(config_path.as_path()).required(true));
        }

        if let Some(secrets_path) = &options.secrets {
            builder = builder.add_source(File::from(secrets_path.as_path()).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("http_api.allowed_origins"),
            )
            .set_override_option("weather.api_key", std::env::var(ENV_API_KEY).ok())?
            .set_override_option("http_api.server.port", options.port.map(i64::from))?
            .build()?;

        config.try_deserialize().context("failed to deserialize weather proxy settings")
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpApiSettings {
    pub server: HttpServerSettings,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "timeout_secs")]
    pub timeout: Duration,

    /// Browser origins permitted to call the API cross-origin.
    pub allowed_origins: Vec<String>,
}

impl Default for HttpApiSettings {
    fn default() -> Self {
        Self {
            server: HttpServerSettings::default(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpServerSettings {
    pub host: String,
    pub port: u16,
}

impl HttpServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpServerSettings {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherProviderSettings {
    pub base_url: Url,

    /// Provider credential. Requests are answered with 400 while it is absent.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    pub units: String,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "timeout_secs")]
    pub timeout: Duration,
}

impl Default for WeatherProviderSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_WEATHER_BASE_URL).expect("valid default weather base url"),
            api_key: None,
            units: DEFAULT_WEATHER_UNITS.to_string(),
            timeout: Duration::from_secs(DEFAULT_WEATHER_TIMEOUT_SECS),
        }
    }
}
