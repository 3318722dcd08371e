use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::ApiError;
use crate::logging::{LogEntry, RequestLogger};
use crate::pagination::PageWindow;
use crate::response::{ApiJson, CollectionDocument, CollectionMeta};
use crate::serialize::{DocumentContext, EntityKind, Families, Persons};
use crate::settings::{ApiConfig, SettingsStore};
use crate::store::TreeStore;

/// Everything a request handler needs, injected via axum state. The store is
/// immutable after startup; settings are re-read from the provider on every
/// request so the admin path never requires a restart.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TreeStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub logger: Arc<RequestLogger>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TreeStore>,
        settings: Arc<dyn SettingsStore>,
        logger: Arc<RequestLogger>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            settings,
            logger,
            base_url: base_url.into(),
        }
    }
}

/// Query parameters accepted by the collection endpoints.
///
/// `limit`/`offset` stay raw strings: a non-numeric value must degrade to the
/// pagination defaults rather than bounce the request at extraction time.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub api_key: Option<String>,
}

/// GET /api/individuals/:tree
pub async fn individuals(
    State(state): State<AppState>,
    Path(tree): Path<String>,
    Query(params): Query<ListParams>,
    method: Method,
    uri: Uri,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<ApiJson<CollectionDocument<<Persons as EntityKind>::Document>>, ApiError> {
    list::<Persons>(&state, &tree, &params, &method, &uri, addr, &headers).await
}

/// GET /api/families/:tree
pub async fn families(
    State(state): State<AppState>,
    Path(tree): Path<String>,
    Query(params): Query<ListParams>,
    method: Method,
    uri: Uri,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<ApiJson<CollectionDocument<<Families as EntityKind>::Document>>, ApiError> {
    list::<Families>(&state, &tree, &params, &method, &uri, addr, &headers).await
}

/// The per-request pipeline shared by both entity kinds.
///
/// Gates run in a fixed order and each failure is terminal: feature flag,
/// credential, tree resolution, then the windowed serialization. Request
/// logging sits between the credential gate and tree resolution and is best
/// effort. Nothing here retries.
async fn list<K: EntityKind>(
    state: &AppState,
    tree_param: &str,
    params: &ListParams,
    method: &Method,
    uri: &Uri,
    addr: SocketAddr,
    headers: &HeaderMap,
) -> Result<ApiJson<CollectionDocument<K::Document>>, ApiError> {
    let config = ApiConfig::load(state.settings.as_ref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !config.enabled {
        return Err(ApiError::Disabled);
    }

    if !auth::authenticate(headers, params.api_key.as_deref(), &config.secret_key) {
        return Err(ApiError::Unauthorized);
    }

    if config.logging_enabled {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let entry = LogEntry::new(
            addr.ip().to_string(),
            method.to_string(),
            uri.to_string(),
            user_agent.to_string(),
        );
        state.logger.log(&entry).await;
    }

    // The original route only matched numeric tree segments; anything else is
    // a URL that does not exist.
    let tree_id: u32 = tree_param.parse().map_err(|_| ApiError::EndpointNotFound)?;
    let tree = state
        .store
        .find_tree(tree_id)
        .await?
        .ok_or(ApiError::TreeNotFound)?;

    let window = PageWindow::from_params(params.limit.as_deref(), params.offset.as_deref());
    let ctx = DocumentContext {
        tree: &tree,
        base_url: &state.base_url,
    };

    let records = K::collection(&tree);
    // Independent of the window by design: an offset past the end still
    // reports the real collection size.
    let total = records.len();

    let data: Vec<K::Document> = records
        .iter()
        .skip(window.offset)
        .take(window.limit)
        .map(|record| K::document(&ctx, record))
        .collect();
    let returned = data.len();

    Ok(ApiJson::ok(CollectionDocument {
        data,
        meta: CollectionMeta {
            total,
            limit: window.limit,
            offset: window.offset,
            returned,
        },
    }))
}

/// GET / - service identity and endpoint map
pub async fn root() -> ApiJson<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    ApiJson::ok(json!({
        "name": "Lineage API",
        "version": version,
        "description": "Read-only JSON API over genealogical trees",
        "endpoints": {
            "individuals": "/api/individuals/:tree (GET, API key required)",
            "families": "/api/families/:tree (GET, API key required)",
            "health": "/health (public)",
        }
    }))
}

/// GET /health - store liveness
pub async fn health(State(state): State<AppState>) -> ApiJson<serde_json::Value> {
    let now = chrono::Utc::now();

    match state.store.tree_count().await {
        Ok(trees) => ApiJson::ok(json!({
            "status": "ok",
            "timestamp": now,
            "trees": trees,
        })),
        Err(e) => ApiJson::with_status(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "degraded",
                "timestamp": now,
                "error": e.to_string(),
            }),
        ),
    }
}

/// Router fallback for any path outside the API surface.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}
