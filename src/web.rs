use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, http::StatusCode};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::TripPlannerConfig;
use crate::flights::{FlightProxyClient, FlightSearch, SerpApiClient};
use crate::generator::GeminiClient;
use crate::itinerary::ItineraryComposer;

/// Wire the configured provider clients into handler state
///
/// The composer shares the in-process provider unless `flights.proxy_url`
/// points it at a flight endpoint.
pub fn build_state(config: &TripPlannerConfig) -> Result<AppState> {
    let provider: Arc<dyn FlightSearch> = Arc::new(
        SerpApiClient::new(&config.flights).context("Failed to set up flight search")?,
    );

    let composer_flights: Arc<dyn FlightSearch> = match &config.flights.proxy_url {
        Some(url) => Arc::new(
            FlightProxyClient::new(url, config.flights.timeout_seconds)
                .context("Failed to set up flight proxy client")?,
        ),
        None => provider.clone(),
    };

    let generator =
        Arc::new(GeminiClient::new(&config.generator).context("Failed to set up generator")?);
    let composer = ItineraryComposer::new(generator, composer_flights)
        .with_booking_link(config.itinerary.booking_link);

    Ok(AppState {
        flights: provider,
        composer: Arc::new(composer),
    })
}

/// The full application router with its middleware
pub fn app(state: AppState, config: &TripPlannerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // A composed itinerary waits on the model and then on the flight search.
    let request_timeout = Duration::from_secs(
        u64::from(config.generator.timeout_seconds) + u64::from(config.flights.timeout_seconds) + 5,
    );

    Router::new()
        .nest("/api", api::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
}

pub async fn run(config: TripPlannerConfig) -> Result<()> {
    let state = build_state(&config)?;
    let app = app(state, &config);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    if let (Some(cert), Some(key)) = (&config.server.tls_cert_path, &config.server.tls_key_path) {
        return serve_tls(app, addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running on port {}", addr.port());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shut down");
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: Router,
    addr: SocketAddr,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS material from {}", cert.display()))?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    tracing::info!("Server running on port {} (TLS)", addr.port());
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    tracing::info!("Server shut down");
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _app: Router,
    _addr: SocketAddr,
    _cert: &std::path::Path,
    _key: &std::path::Path,
) -> Result<()> {
    anyhow::bail!("TLS paths are configured but this build has no `tls` feature")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
