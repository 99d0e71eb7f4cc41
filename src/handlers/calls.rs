use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::engine::calls::{spawn_ticker, CallHandle};
use crate::handlers::auth::session_token;
use crate::metrics::collector::Metrics;
use crate::models::api::CallResponse;
use crate::validation::params::StartCallParams;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Pay (mock) and start a countdown call with a model
///
/// POST /calls
pub async fn start_call_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<StartCallParams>,
) -> Result<Response, MarketError> {
    let me = state
        .sessions
        .resolve_user(session_token(&headers), state.store.as_ref())?;

    let handle = state
        .calls
        .start_call(&me.identifier, params.target.trim(), params.minutes)?;
    let metrics = Arc::clone(&state.metrics);
    spawn_ticker(Arc::clone(&handle), move || {
        Metrics::increment(&metrics.calls_expired);
        Metrics::increment(&metrics.calls_ended);
    });
    Metrics::increment(&state.metrics.calls_started);

    Ok((StatusCode::CREATED, Json(CallResponse::new(&handle))).into_response())
}

/// GET /calls/{id}
pub async fn call_status_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(call_id): Path<u64>,
) -> Result<Response, MarketError> {
    let handle = owned_call(&state, &headers, call_id)?;

    Ok((StatusCode::OK, Json(CallResponse::new(&handle))).into_response())
}

/// POST /calls/{id}/end
///
/// Ending an already ended call returns its final state.
pub async fn end_call_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(call_id): Path<u64>,
) -> Result<Response, MarketError> {
    let handle = owned_call(&state, &headers, call_id)?;

    if handle.end() {
        Metrics::increment(&state.metrics.calls_ended);
    }

    Ok((StatusCode::OK, Json(CallResponse::new(&handle))).into_response())
}

// Other users' calls look the same as missing ones
fn owned_call(
    state: &AppState,
    headers: &HeaderMap,
    call_id: u64,
) -> Result<Arc<CallHandle>, MarketError> {
    let me = state
        .sessions
        .resolve_user(session_token(headers), state.store.as_ref())?;

    state
        .calls
        .get(call_id)
        .filter(|handle| handle.caller == me.identifier)
        .ok_or(MarketError::CallNotFound(call_id))
}
