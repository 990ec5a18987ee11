//! Route handlers: company-account root, resource family routes, and the
//! private closure endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use accounts_domain::errors::codes;
use accounts_domain::model::CompanyAccount;
use accounts_domain::{Errors, IdentityDeriver, Transaction, ValidationError};
use accounts_service::{Outcome, RequestContext, ServiceError};

use super::json_error;
use super::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";
const COMPANY_ACCOUNTS_ROOT: &str = "$.company_accounts";

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /healthcheck
pub(crate) async fn handle_healthcheck() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

fn request_context(transaction: Transaction, headers: &HeaderMap) -> RequestContext {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| IdentityDeriver::new().derive_random());
    RequestContext::new(transaction, request_id)
}

fn validation_failed(errors: Errors) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
}

/// Parse a request body. An empty body is JSON `null`; malformed JSON is a
/// validation failure at `root`.
fn parse_body(body: &Bytes, root: &str) -> Result<Value, Response> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        let mut errors = Errors::new();
        errors.push(ValidationError::new(codes::INVALID_JSON, root).with_value("message", e));
        validation_failed(errors)
    })
}

fn outcome_response(outcome: Outcome<Value>) -> Response {
    match outcome {
        Outcome::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Outcome::Found(body) => (StatusCode::OK, Json(body)).into_response(),
        Outcome::Updated | Outcome::Deleted => StatusCode::NO_CONTENT.into_response(),
        Outcome::NotFound => json_error(StatusCode::NOT_FOUND, "not found"),
        Outcome::DuplicateKey => json_error(StatusCode::CONFLICT, "resource already exists"),
        Outcome::ValidationFailed(errors) => validation_failed(errors),
    }
}

fn service_error(err: ServiceError) -> Response {
    error!(error = %err, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

fn respond(result: Result<Outcome<Value>, ServiceError>) -> Response {
    match result {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => service_error(err),
    }
}

/// `404` unless the company account exists under this transaction.
async fn require_company_account(state: &AppState, company_account_id: &str, transaction_id: &str) -> Option<Response> {
    match state.company_accounts.belongs_to(company_account_id, transaction_id).await {
        Ok(true) => None,
        Ok(false) => Some(json_error(
            StatusCode::NOT_FOUND,
            &format!("company account '{}' not found", company_account_id),
        )),
        Err(err) => Some(service_error(err)),
    }
}

/// POST /transactions/{transaction_id}/company-accounts
pub(crate) async fn handle_create_company_account(
    State(state): State<Arc<AppState>>,
    Extension(transaction): Extension<Transaction>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let value = match parse_body(&body, COMPANY_ACCOUNTS_ROOT) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let account: CompanyAccount = match serde_json::from_value(if value.is_null() { json!({}) } else { value }) {
        Ok(account) => account,
        Err(e) => {
            let mut errors = Errors::new();
            errors.push(ValidationError::new(codes::INVALID_JSON, COMPANY_ACCOUNTS_ROOT).with_value("message", e));
            return validation_failed(errors);
        }
    };

    let ctx = request_context(transaction, &headers);
    respond(
        state
            .company_accounts
            .create(&account, &ctx)
            .await
            .map(|outcome| outcome.map(|d| d.to_response())),
    )
}

/// GET /transactions/{transaction_id}/company-accounts/{company_account_id}
pub(crate) async fn handle_get_company_account(
    State(state): State<Arc<AppState>>,
    Path((transaction_id, company_account_id)): Path<(String, String)>,
) -> Response {
    if let Some(response) = require_company_account(&state, &company_account_id, &transaction_id).await {
        return response;
    }
    respond(
        state
            .company_accounts
            .find(&company_account_id)
            .await
            .map(|outcome| outcome.map(|d| d.to_response())),
    )
}

/// Any method on /transactions/{transaction_id}/company-accounts/{company_account_id}/{*path}
pub(crate) async fn handle_resource(
    State(state): State<Arc<AppState>>,
    Extension(transaction): Extension<Transaction>,
    Path((transaction_id, company_account_id, path)): Path<(String, String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(response) = require_company_account(&state, &company_account_id, &transaction_id).await {
        return response;
    }
    let Some(resolved) = state.registry.resolve(&path) else {
        return json_error(StatusCode::NOT_FOUND, "not found");
    };
    let service = resolved.service;
    let member_id = resolved.member_id.as_deref();
    let ctx = request_context(transaction, &headers);

    let result = match method {
        Method::POST => {
            if member_id.is_some() {
                return json_error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
            }
            let value = match parse_body(&body, &service.descriptor().json_root()) {
                Ok(value) => value,
                Err(response) => return response,
            };
            service.create(value, &company_account_id, &ctx).await
        }
        Method::PUT => {
            let value = match parse_body(&body, &service.descriptor().json_root()) {
                Ok(value) => value,
                Err(response) => return response,
            };
            service.update(value, &company_account_id, member_id, &ctx).await
        }
        Method::GET => service.find(&company_account_id, member_id, &ctx).await,
        Method::DELETE => service.delete(&company_account_id, member_id, &ctx).await,
        _ => return json_error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
    };
    respond(result)
}

/// GET /private/transactions/{transaction_id}/company-accounts/{company_account_id}/validation-status
pub(crate) async fn handle_validation_status(
    State(state): State<Arc<AppState>>,
    Extension(transaction): Extension<Transaction>,
    Path((transaction_id, company_account_id)): Path<(String, String)>,
) -> Response {
    if let Some(response) = require_company_account(&state, &company_account_id, &transaction_id).await {
        return response;
    }
    match state.closure.validate(&transaction, &company_account_id).await {
        Ok(errors) => {
            let body = json!({ "is_valid": errors.is_empty(), "errors": errors });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_error(err),
    }
}

/// GET /private/transactions/{transaction_id}/company-accounts/{company_account_id}/filings
pub(crate) async fn handle_filings(
    State(state): State<Arc<AppState>>,
    Extension(transaction): Extension<Transaction>,
    Path((transaction_id, company_account_id)): Path<(String, String)>,
) -> Response {
    if let Some(response) = require_company_account(&state, &company_account_id, &transaction_id).await {
        return response;
    }
    let errors = match state.closure.validate(&transaction, &company_account_id).await {
        Ok(errors) => errors,
        Err(err) => return service_error(err),
    };
    if errors.has_errors() {
        info!(company_account_id = %company_account_id, errors = errors.len(), "accounts not closeable");
        return validation_failed(errors);
    }

    match state.filings.generate_filing(&transaction, &company_account_id).await {
        Some(filing) => (StatusCode::OK, Json(vec![filing])).into_response(),
        None => {
            warn!(company_account_id = %company_account_id, "no filing produced");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "filing could not be generated")
        }
    }
}
