//! Profile form server entry point.

use std::error::Error;
use std::sync::Arc;

use profile_form_api::config::AppConfig;
use profile_form_api::state::AppState;
use profile_form_core::clock::SystemClock;
use profile_form_event_store::in_memory_event_repository::InMemoryEventRepository;
use profile_form_event_store::simulated_submit_gateway::SimulatedSubmitGateway;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting profile form server");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(SimulatedSubmitGateway::new(config.submit_delay)),
    );

    let app = profile_form_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(submit_delay_ms = config.submit_delay.as_millis(), "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
