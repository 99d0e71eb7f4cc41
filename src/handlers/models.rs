use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::handlers::auth::session_token;
use crate::models::api::{AccountListResponse, AccountResponse};
use crate::validation::params::ProfileParams;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Approved models currently online
///
/// GET /models/online
pub async fn online_models_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MarketError> {
    state
        .sessions
        .resolve_user(session_token(&headers), state.store.as_ref())?;

    let online = state.directory.online_models()?;
    Ok((StatusCode::OK, Json(AccountListResponse::new(online))).into_response())
}

/// Save the logged-in model's own profile
///
/// PUT /me/profile
pub async fn save_profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<ProfileParams>,
) -> Result<Response, MarketError> {
    let me = state
        .sessions
        .resolve_user(session_token(&headers), state.store.as_ref())?;

    let account = state.lifecycle.save_model_profile(
        &me.identifier,
        params.rate_per_minute,
        params.availability(),
        params.photo(),
        params.is_online,
    )?;

    Ok((StatusCode::OK, Json(AccountResponse::new(&account))).into_response())
}
