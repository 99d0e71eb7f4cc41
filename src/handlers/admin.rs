use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::handlers::auth::session_token;
use crate::metrics::collector::Metrics;
use crate::models::api::{AccountListResponse, AccountResponse, SuccessResponse};
use crate::validation::params::ForceOnlineParams;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Registrations awaiting approval
///
/// GET /admin/pending
pub async fn pending_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    let pending = state.directory.pending_models()?;
    Ok((StatusCode::OK, Json(AccountListResponse::new(pending))).into_response())
}

/// Every model-eligible account, pending or approved
///
/// GET /admin/models
pub async fn all_models_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    let models = state.directory.all_model_accounts()?;
    Ok((StatusCode::OK, Json(AccountListResponse::new(models))).into_response())
}

/// POST /admin/models/{id}/approve
pub async fn approve_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    state.lifecycle.approve(&identifier)?;
    Metrics::increment(&state.metrics.approvals);

    Ok((StatusCode::OK, Json(SuccessResponse::new("Model approved"))).into_response())
}

/// Reject & delete a registration
///
/// POST /admin/models/{id}/reject
pub async fn reject_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    state.lifecycle.reject(&identifier)?;
    state.chat.forget(&identifier);
    Metrics::increment(&state.metrics.rejections);

    Ok((StatusCode::OK, Json(SuccessResponse::new("Registration deleted"))).into_response())
}

/// POST /admin/models/{id}/online
pub async fn force_online_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
    Json(params): Json<ForceOnlineParams>,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    let account = state.lifecycle.force_set_online(&identifier, params.online)?;

    Ok((StatusCode::OK, Json(AccountResponse::new(&account))).into_response())
}

/// DELETE /admin/accounts/{id}
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    state.lifecycle.delete_account(&identifier)?;
    state.chat.forget(&identifier);
    Metrics::increment(&state.metrics.deletions);

    Ok((StatusCode::OK, Json(SuccessResponse::new("Account deleted"))).into_response())
}
