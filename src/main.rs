use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use lineage_api::config;
use lineage_api::handlers::{self, AppState};
use lineage_api::logging::RequestLogger;
use lineage_api::settings::FileSettingsStore;
use lineage_api::store::MemoryTreeStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up LINEAGE_DATA_FILE etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("serving trees from {}", config.data_file.display());

    let store = MemoryTreeStore::load(&config.data_file)
        .await
        .unwrap_or_else(|e| panic!("failed to load {}: {}", config.data_file.display(), e));

    let state = AppState::new(
        Arc::new(store),
        Arc::new(FileSettingsStore::new(&config.settings_file)),
        Arc::new(RequestLogger::new(&config.log_file)),
        config.public_base_url.clone(),
    );

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("LINEAGE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Lineage API listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Key-authenticated API
        .merge(api_routes())
        // Everything else
        .fallback(handlers::endpoint_not_found)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/individuals/:tree", get(handlers::individuals))
        .route("/api/families/:tree", get(handlers::families))
}
