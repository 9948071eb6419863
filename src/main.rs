use clap::Parser;
use weather_proxy::{load_dotenv, CliOptions, Server, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = weather_proxy::tracing::get_tracing_subscriber("info");
    weather_proxy::tracing::init_subscriber(subscriber)?;

    let options = parse_options();
    load_dotenv(options.env_file.as_deref());
    let settings = load_settings(&options)?;

    let server = Server::build(&settings).await?;
    server.run_until_stopped().await.map_err(|err| err.into())
}

fn parse_options() -> CliOptions {
    let options = CliOptions::parse();
    if options.secrets.is_none() {
        tracing::warn!("No secrets configuration provided. The weather provider API key should be confined in a secret configuration or sourced from the environment.");
    }

    options
}

fn load_settings(options: &CliOptions) -> anyhow::Result<Settings> {
    let settings = Settings::load(options)?;
    if settings.weather.api_key.is_none() {
        tracing::warn!(
            "No weather provider API key configured (set {}); every weather request will be rejected as a bad request.",
            CliOptions::env_api_key()
        );
    }

    Ok(settings)
}
