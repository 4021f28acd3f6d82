mod models;
mod service;
mod store;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{HeaderValue, Request},
    middleware::{Next, from_fn},
};
use claim_wizard::{Catalog, ClaimFlow, HttpAdjudicationClient, PreviewStore};
use tracing::{Instrument, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::service::{AppState, build_router};
use crate::store::InMemorySessionStore;

/// Initialize structured tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "claim_wizard_service=debug,claim_wizard=debug,tower_http=debug".into());

    match log_format.as_str() {
        "pretty" => {
            // Human-readable logging for development
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            // Structured JSON logging for production
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    request.headers_mut().insert(
        "x-correlation-id",
        HeaderValue::from_str(&correlation_id).unwrap(),
    );

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let client = HttpAdjudicationClient::from_env();
    info!(base_url = client.base_url(), "using adjudication service");

    let flow = ClaimFlow::new(Arc::new(Catalog::new()), Arc::new(client));

    // Warm the catalog. A failure here is reported and retried on the next
    // /catalog request instead of taking the service down.
    if let Err(e) = flow.ensure_reference().await {
        error!("initial reference load failed: {}", e);
    }

    let app_state = AppState {
        flow,
        store: Arc::new(InMemorySessionStore::new()),
        previews: Arc::new(PreviewStore::new()),
    };

    let app = build_router(app_state).layer(from_fn(correlation_id_middleware));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
