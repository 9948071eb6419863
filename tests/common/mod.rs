#![allow(dead_code)]

use once_cell::sync::Lazy;
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use url::Url;
use weather_proxy::{HttpApiSettings, HttpServerSettings, Server, Settings, WeatherProviderSettings};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key-0123456789";
pub const WEATHER_PATH: &str = "/data/2.5/weather";

// Set TEST_LOG to see server logs, e.g. `TEST_LOG=true cargo test | bunyan`.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_directives = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = weather_proxy::tracing::get_tracing_subscriber_with_sink(
            default_directives,
            std::io::stdout,
        );
        weather_proxy::tracing::init_subscriber(subscriber).expect("failed to init test tracing");
    } else {
        let subscriber = weather_proxy::tracing::get_tracing_subscriber_with_sink(
            default_directives,
            std::io::sink,
        );
        weather_proxy::tracing::init_subscriber(subscriber).expect("failed to init test tracing");
    }
});

pub struct TestApp {
    pub address: String,
    pub provider: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get_weather(&self, city: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(format!("{}/weather", self.address));
        if let Some(city) = city {
            request = request.query(&[("city", city)]);
        }

        request.send().await.expect("failed to execute weather request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .expect("failed to execute request")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Starts a mock provider and the proxy on an ephemeral port, pointed at that provider.
/// `customize` may adjust the settings before the server is built.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let provider = MockServer::start().await;
    let mut settings = Settings {
        http_api: HttpApiSettings {
            server: HttpServerSettings { host: "127.0.0.1".to_string(), port: 0 },
            ..HttpApiSettings::default()
        },
        weather: WeatherProviderSettings {
            base_url: Url::parse(&format!("{}/data/2.5", provider.uri())).expect("mock provider url"),
            api_key: Some(SecretString::new(API_KEY.to_string())),
            timeout: Duration::from_secs(5),
            ..WeatherProviderSettings::default()
        },
    };
    customize(&mut settings);

    let server = Server::build(&settings).await.expect("failed to build weather proxy");
    let address = format!("http://127.0.0.1:{}", server.port());
    tokio::spawn(server.run_until_stopped());

    TestApp { address, provider, client: reqwest::Client::new() }
}

/// A provider current-weather document for London, including fields the proxy must drop.
pub fn london_document() -> serde_json::Value {
    json!({
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
        "base": "stations",
        "main": {
            "temp": 15.0,
            "feels_like": 14.2,
            "temp_min": 13.9,
            "temp_max": 16.1,
            "pressure": 1012,
            "humidity": 70
        },
        "visibility": 10000,
        "wind": {"speed": 3.1, "deg": 240},
        "clouds": {"all": 100},
        "dt": 1_700_000_000,
        "sys": {"type": 2, "id": 2_075_535, "country": "GB", "sunrise": 1_699_945_000, "sunset": 1_699_977_000},
        "timezone": 0,
        "id": 2_643_743,
        "name": "London",
        "cod": 200
    })
}

pub fn london_projection() -> serde_json::Value {
    json!({
        "name": "London",
        "sys": {"country": "GB"},
        "main": {"temp": 15.0, "feels_like": 14.2, "humidity": 70, "pressure": 1012},
        "weather": [{"main": "Clouds", "description": "overcast clouds"}],
        "wind": {"speed": 3.1},
        "visibility": 10000
    })
}
