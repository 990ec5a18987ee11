//! `accounts serve`: the company accounts HTTP API.
//!
//! Endpoints:
//! - GET  /healthcheck                                          - liveness (exempt from auth)
//! - POST /transactions/{tid}/company-accounts                  - create the root
//! - GET  /transactions/{tid}/company-accounts/{caid}           - fetch the root
//! - *    /transactions/{tid}/company-accounts/{caid}/{*path}   - any resource below the root
//! - GET  /private/transactions/{tid}/company-accounts/{caid}/validation-status
//! - GET  /private/transactions/{tid}/company-accounts/{caid}/filings
//!
//! Every transaction route runs behind the transaction interceptor. All
//! responses are JSON.

mod handlers;
mod middleware;
mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{middleware as axum_middleware, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use accounts_service::clients::http::{
    HttpClientConfig, HttpCompanyProfileClient, HttpDocumentDownloader, HttpDocumentGenerator,
    HttpDocumentValidator, HttpTransactionClient,
};
use accounts_service::clients::DocumentValidator;
use accounts_service::SharedStore;
use accounts_storage::MemoryStore;

use crate::config::AppConfig;

use self::handlers::{
    handle_create_company_account, handle_filings, handle_get_company_account, handle_healthcheck,
    handle_not_found, handle_resource, handle_validation_status,
};
use self::middleware::{auth_middleware, rate_limit_middleware, transaction_middleware};

pub use self::state::{AppState, Clients};

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Rate limit window duration in seconds (1 minute).
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

const HEALTHCHECK_PATH: &str = "/healthcheck";

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// The full API router over prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    let transaction_routes = Router::new()
        .route(
            "/transactions/{transaction_id}/company-accounts",
            post(handle_create_company_account),
        )
        .route(
            "/transactions/{transaction_id}/company-accounts/{company_account_id}",
            get(handle_get_company_account),
        )
        .route(
            "/transactions/{transaction_id}/company-accounts/{company_account_id}/{*path}",
            any(handle_resource),
        )
        .route(
            "/private/transactions/{transaction_id}/company-accounts/{company_account_id}/validation-status",
            get(handle_validation_status),
        )
        .route(
            "/private/transactions/{transaction_id}/company-accounts/{company_account_id}/filings",
            get(handle_filings),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            transaction_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route(HEALTHCHECK_PATH, get(handle_healthcheck))
        .merge(transaction_routes)
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

/// Outbound HTTP clients described by the configuration.
pub fn http_clients(config: &AppConfig) -> Clients {
    let services = &config.services;
    let client = |base_url: &str| HttpClientConfig {
        base_url: base_url.to_string(),
        api_key: services.internal_api_key.clone(),
        timeout: services.timeout(),
    };

    let validator: Option<Arc<dyn DocumentValidator>> = if config.filing.ixbrl_validation_enabled {
        Some(Arc::new(HttpDocumentValidator::new(&client(
            &services.document_validator_api_url,
        ))))
    } else {
        None
    };

    Clients {
        transactions: Arc::new(HttpTransactionClient::new(&client(&services.transactions_api_url))),
        profiles: Arc::new(HttpCompanyProfileClient::new(&client(
            &services.company_profile_api_url,
        ))),
        generator: Arc::new(HttpDocumentGenerator::new(&client(
            &services.document_generator_api_url,
        ))),
        downloader: Arc::new(HttpDocumentDownloader::new(&client(
            &services.document_generator_api_url,
        ))),
        validator,
    }
}

/// Start the server on `config.server.port` with an in-memory store.
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store,
        http_clients(&config),
        config.server.api_key.clone(),
        config.server.rate_limit,
    );

    if state.api_key.is_some() {
        info!("API key authentication enabled");
    }
    info!(
        rate_limit = config.server.rate_limit,
        ixbrl_validation = config.filing.ixbrl_validation_enabled,
        "server configured"
    );

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "company accounts API listening");
    run(listener, state, shutdown_signal()).await?;

    info!("server shut down");
    Ok(())
}

/// Wait for Ctrl+C. If the handler cannot be installed the server runs
/// until killed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
