// Metrics endpoint

use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::handlers::auth::session_token;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Counters plus live account, session and call counts
///
/// GET /admin/metrics
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MarketError> {
    state.sessions.require_admin(session_token(&headers))?;

    let snapshot =
        state
            .metrics
            .get_snapshot(state.store.as_ref(), &state.sessions, &state.calls)?;

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}
