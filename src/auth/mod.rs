use axum::http::HeaderMap;
use rand::RngCore;

/// Check an inbound request's credential against the configured secret.
///
/// The credential is taken from the `Authorization: Bearer <token>` header
/// when present, otherwise from the `api_key` query parameter. An empty
/// stored secret rejects everything — a deployment without a generated key
/// exposes nothing.
pub fn authenticate(headers: &HeaderMap, query_api_key: Option<&str>, stored_secret: &str) -> bool {
    if stored_secret.is_empty() {
        return false;
    }

    if let Some(token) = bearer_token(headers) {
        return constant_time_eq(stored_secret, token);
    }

    if let Some(key) = query_api_key {
        return constant_time_eq(stored_secret, key);
    }

    false
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; any run of whitespace may
/// separate it from the token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let rest = value.trim_start();

    let (scheme, token) = rest.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim_start();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

/// Generate a fresh API key: 32 random bytes, hex-encoded (64 characters).
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
