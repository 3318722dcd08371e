use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// JSON responder shared by every success and error path.
///
/// Payloads are pretty-printed with struct field order preserved and
/// non-ASCII characters emitted literally. The CORS trio and the charset
/// content type go on every response, errors included, so browser clients
/// see identical headers no matter how a request ends.
#[derive(Debug)]
pub struct ApiJson<T: Serialize> {
    status: StatusCode,
    payload: T,
}

impl<T: Serialize> ApiJson<T> {
    pub fn ok(payload: T) -> Self {
        Self::with_status(StatusCode::OK, payload)
    }

    pub fn with_status(status: StatusCode, payload: T) -> Self {
        Self { status, payload }
    }
}

fn headers() -> [(header::HeaderName, &'static str); 4] {
    [
        (header::CONTENT_TYPE, CONTENT_TYPE_JSON),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
    ]
}

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.payload) {
            Ok(body) => (self.status, headers(), body).into_response(),
            Err(e) => {
                tracing::error!("failed to serialize response payload: {}", e);
                let body = "{\n  \"error\": \"failed to serialize response\"\n}".to_string();
                (StatusCode::INTERNAL_SERVER_ERROR, headers(), body).into_response()
            }
        }
    }
}

/// Success body for collection endpoints: the windowed documents plus the
/// window bookkeeping.
#[derive(Debug, Serialize)]
pub struct CollectionDocument<T: Serialize> {
    pub data: Vec<T>,
    pub meta: CollectionMeta,
}

#[derive(Debug, Serialize)]
pub struct CollectionMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub returned: usize,
}
