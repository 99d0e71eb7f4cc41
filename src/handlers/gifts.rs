use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::handlers::auth::session_token;
use crate::metrics::collector::Metrics;
use crate::models::api::GiftResponse;
use crate::validation::params::GiftParams;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// POST /gifts
pub async fn gift_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<GiftParams>,
) -> Result<Response, MarketError> {
    state
        .sessions
        .resolve_user(session_token(&headers), state.store.as_ref())?;

    let target = params.target.trim();
    let account = state.gifts.send_gift(target, params.amount)?;
    Metrics::increment(&state.metrics.gifts_sent);

    Ok((
        StatusCode::OK,
        Json(GiftResponse {
            success: true,
            target: account.identifier,
            amount: params.amount,
            gift_total: account.gift_total,
        }),
    )
        .into_response())
}
