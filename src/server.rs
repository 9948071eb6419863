mod errors;
mod health_routes;
mod result;
mod state;
mod weather_routes;

pub use errors::ApiError;

use crate::settings::{HttpApiSettings, WeatherProviderSettings};
use crate::Settings;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, Method, Response, StatusCode, Uri};
use axum::{BoxError, Router};
use health_routes::HealthApiDoc;
use std::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::ServiceBuilderExt;
use utoipa::OpenApi;
use utoipa_swagger_ui::{SwaggerUi, Url as SwaggerUrl};
use weather_routes::WeatherApiDoc;

pub type HttpJoinHandle = JoinHandle<Result<(), ApiError>>;

pub struct Server {
    port: u16,
    server_handle: HttpJoinHandle,
}

impl Server {
    #[tracing::instrument(level = "debug", skip(settings))]
    pub async fn build(settings: &Settings) -> Result<Self, ApiError> {
        let address = settings.http_api.server.address();
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!(
            "{:?} API listening on {address}: {listener:?}",
            std::env::current_exe()
        );
        let std_listener = listener.into_std()?;
        let port = std_listener.local_addr()?.port();

        let server_handle =
            run_http_server(std_listener, &RunParameters::from_settings(settings))?;

        Ok(Self { port, server_handle })
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), ApiError> {
        self.server_handle.await?
    }
}

#[derive(Debug, Clone)]
pub struct RunParameters {
    pub http_api: HttpApiSettings,
    pub weather: WeatherProviderSettings,
}

impl RunParameters {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            http_api: settings.http_api.clone(),
            weather: settings.weather.clone(),
        }
    }
}

#[tracing::instrument(level = "trace")]
pub fn run_http_server(
    listener: TcpListener, params: &RunParameters,
) -> Result<HttpJoinHandle, ApiError> {
    let state = state::initialize_app_state(&params.weather)?;
    let cors = cors_layer(&params.http_api.allowed_origins)?;

    let middleware_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_api_error))
        .timeout(params.http_api.timeout)
        .compression()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .propagate_x_request_id()
        .layer(cors);

    let api_routes: Router = Router::new()
        .merge(health_routes::api())
        .merge(weather_routes::api())
        .with_state(state);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").urls(vec![
            (
                SwaggerUrl::with_primary("weather_api", "/api-doc/weather-openapi.json", true),
                WeatherApiDoc::openapi(),
            ),
            (
                SwaggerUrl::new("health_api", "/api-doc/health-openapi.json"),
                HealthApiDoc::openapi(),
            ),
        ]))
        .merge(api_routes)
        .fallback(fallback)
        .layer(middleware_stack);

    let handle = tokio::spawn(async move {
        tracing::debug!(app_routes=?app, "starting API server...");
        let builder = axum::Server::from_tcp(listener)?;
        let server = builder.serve(app.into_make_service());
        let graceful = server.with_graceful_shutdown(shutdown_signal());
        graceful.await?;
        tracing::info!("{:?} API shutting down", std::env::current_exe());
        Ok(())
    });

    Ok(handle)
}

/// Browser origins outside `allowed_origins` get no `access-control-allow-origin` header. A `*`
/// entry opens the API to every origin.
fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, ApiError> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|source| ApiError::AllowedOrigin { origin: origin.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers(Any))
}

async fn fallback(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("No route found for {uri}"))
}

async fn handle_api_error(error: BoxError) -> Response<String> {
    let status = if error.is::<tower::timeout::error::Elapsed>() {
        StatusCode::REQUEST_TIMEOUT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::error!(%status, "HTTP middleware error: {error}");
    let label = status.canonical_reason().unwrap_or("ERROR").to_uppercase();
    let response = Response::new(format!("{label}: {error}"));
    let (mut parts, body) = response.into_parts();
    parts.status = status;
    Response::from_parts(parts, body)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            },
            Err(error) => {
                tracing::error!(%error, "failed to install terminate signal handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}
