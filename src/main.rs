//! Symptom Guide server binary.
//!
//! Startup order matters: configuration and the condition catalog are
//! fatal-on-error before the engine is usable; per-turn errors do not exist.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use symptom_guide::adapters::http::{chat_router, ChatAppState};
use symptom_guide::adapters::{CsvCatalogLoader, InMemorySessionStore};
use symptom_guide::config::AppConfig;
use symptom_guide::domain::triage::TriageEngine;
use symptom_guide::ports::CatalogSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog = CsvCatalogLoader::new(&config.catalog.path).load()?;
    tracing::info!(
        conditions = catalog.len(),
        symptoms = catalog.known_symptoms().len(),
        path = %config.catalog.path.display(),
        "condition catalog loaded"
    );

    let engine = Arc::new(TriageEngine::new(catalog));
    let sessions = Arc::new(InMemorySessionStore::new(engine));
    let state = ChatAppState::new(sessions);

    let app = chat_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "symptom guide listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer: configured origins when present, otherwise open
/// (the API carries no credentials or secrets).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
