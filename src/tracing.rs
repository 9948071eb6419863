use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Bunyan-formatted JSON subscriber writing to stdout. `RUST_LOG` takes precedence over
/// `default_directives`.
pub fn get_tracing_subscriber(default_directives: &str) -> impl Subscriber + Send + Sync {
    get_tracing_subscriber_with_sink(default_directives, std::io::stdout)
}

pub fn get_tracing_subscriber_with_sink<S>(
    default_directives: &str, sink: S,
) -> impl Subscriber + Send + Sync
where
    S: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let formatting_layer = BunyanFormattingLayer::new(APP_NAME.into(), sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `subscriber` as the global default and routes `log` records into it. Only the first
/// call in a process can succeed.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
