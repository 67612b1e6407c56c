//! Cognito Server Library
//!
//! Provides the HTTP API for the refactoring copilot.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use cognito_core::{CognitoConfig, CopilotService};
use std::sync::Once;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber (only once)
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| {
                    "cognito_server=debug,cognito_core=info,tower_http=debug".into()
                }),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/api/health", get(routes::health_check))
        .route("/refactor", post(routes::refactor))
        .route("/chat", post(routes::chat))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the Cognito server with the given configuration
///
/// Generation provider problems (unknown provider, missing API key) are
/// reported here, before the listener is bound.
pub async fn run_server(config: CognitoConfig) -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Cognito Server...");

    let service = CopilotService::from_config(&config)?;
    let app = build_router(AppState::new(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
