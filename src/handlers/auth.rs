use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::engine::lifecycle::Lifecycle;
use crate::metrics::collector::Metrics;
use crate::models::api::{AccountResponse, LoginResponse, MeResponse, SuccessResponse};
use crate::models::session::SessionKind;
use crate::utils::auth::{bearer_token, verify_secret};
use crate::validation::params::{AdminLoginParams, LoginParams, RegisterParams};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Session token from the `Authorization` header, if any
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
}

/// POST /register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<RegisterParams>,
) -> Result<Response, MarketError> {
    let reg = params.validate()?;

    let account = state.lifecycle.register(
        &reg.display_name,
        &reg.identifier,
        &reg.secret,
        reg.gender,
    )?;
    // The identifier may belong to an account deleted by another process
    state.chat.forget(&account.identifier);
    Metrics::increment(&state.metrics.registrations);

    Ok((StatusCode::CREATED, Json(AccountResponse::new(&account))).into_response())
}

/// POST /login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<LoginParams>,
) -> Result<Response, MarketError> {
    let account = state
        .lifecycle
        .authenticate(params.mobile.trim(), &params.password)
        .inspect_err(|_| Metrics::increment(&state.metrics.failed_logins))?;

    let token = state.sessions.start_user_session(&account.identifier);

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            token,
            dashboard: Lifecycle::dashboard_for(&account).to_string(),
            account: Some(account.into()),
        }),
    )
        .into_response())
}

/// POST /admin/login
pub async fn admin_login_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<AdminLoginParams>,
) -> Result<Response, MarketError> {
    let admin = &state.config.admin;
    let user_ok = verify_secret(params.username.trim(), &admin.username);
    let pass_ok = verify_secret(&params.password, &admin.password);

    if !(user_ok && pass_ok) {
        warn!("Failed admin login");
        Metrics::increment(&state.metrics.failed_logins);
        return Err(MarketError::InvalidCredentials);
    }

    let token = state.sessions.start_admin_session();

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            token,
            dashboard: "admin".to_string(),
            account: None,
        }),
    )
        .into_response())
}

/// POST /logout
///
/// Always succeeds, even without a live session.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.end_session(token);
    }

    (StatusCode::OK, Json(SuccessResponse::new("Logged out")))
}

/// GET /me
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, MarketError> {
    let token = session_token(&headers);
    let session = token
        .and_then(|t| state.sessions.current(t))
        .ok_or(MarketError::Unauthenticated)?;

    let response = match session.kind {
        SessionKind::Admin => MeResponse {
            success: true,
            dashboard: "admin".to_string(),
            account: None,
        },
        SessionKind::User { .. } => {
            let account = state.sessions.resolve_user(token, state.store.as_ref())?;
            MeResponse {
                success: true,
                dashboard: Lifecycle::dashboard_for(&account).to_string(),
                account: Some(account.into()),
            }
        }
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
