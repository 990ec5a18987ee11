//! HTTP middleware: rate limiting, API key authentication, and the
//! transaction interceptor.

use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use super::state::AppState;
use super::{json_error, HEALTHCHECK_PATH};

/// Rate limiting middleware. Checks per-IP request rate before routing.
pub(crate) async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match state.rate_limiter.check(addr.ip()).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            debug!(ip = %addr.ip(), limit = state.rate_limiter.max_requests, "rate limited");
            let body = serde_json::json!({
                "error": "rate limit exceeded",
                "retry_after": retry_after,
            });
            (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
        }
    }
}

/// API key authentication middleware.
///
/// With a key configured, every request except the health check must send
/// either `Authorization: Bearer <key>` or `X-API-Key: <key>`.
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(expected_key) = &state.api_key else {
        return next.run(request).await;
    };
    if request.uri().path() == HEALTHCHECK_PATH {
        return next.run(request).await;
    }

    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let header_key = request.headers().get("x-api-key").and_then(|v| v.to_str().ok());

    match bearer.or(header_key) {
        Some(key) if key == expected_key => next.run(request).await,
        Some(_) => json_error(StatusCode::FORBIDDEN, "invalid API key"),
        None => json_error(StatusCode::UNAUTHORIZED, "authentication required"),
    }
}

/// Transaction id from `/transactions/{id}/..` or `/private/transactions/{id}/..`.
pub(crate) fn transaction_id(path: &str) -> Option<&str> {
    let path = path.strip_prefix("/private").unwrap_or(path);
    let rest = path.strip_prefix("/transactions/")?;
    rest.split('/').next().filter(|id| !id.is_empty())
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// Load the transaction a request runs under and attach it to the request.
///
/// Unknown transactions are `404`; writes against a transaction that is no
/// longer open are `403`.
pub(crate) async fn transaction_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(id) = transaction_id(request.uri().path()).map(str::to_string) else {
        return json_error(StatusCode::NOT_FOUND, "not found");
    };

    let transaction = match state.transactions.get(&id).await {
        Ok(Some(transaction)) => transaction,
        Ok(None) => {
            return json_error(StatusCode::NOT_FOUND, &format!("transaction '{}' not found", id));
        }
        Err(e) => {
            error!(transaction_id = %id, error = %e, "transaction lookup failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "transaction lookup failed");
        }
    };

    if is_mutating(request.method()) && !transaction.is_open() {
        debug!(transaction_id = %id, status = ?transaction.status, "write to closed transaction");
        return json_error(StatusCode::FORBIDDEN, "transaction is not open");
    }

    request.extensions_mut().insert(transaction);
    next.run(request).await
}
