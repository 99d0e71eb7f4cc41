use crate::core::error::MarketError;
use crate::core::state::AppState;
use crate::handlers::auth::session_token;
use crate::models::api::ChatResponse;
use crate::models::account::Account;
use crate::validation::params::ChatParams;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// POST /chat/{id}
pub async fn send_chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(peer): Path<String>,
    Json(params): Json<ChatParams>,
) -> Result<Response, MarketError> {
    let (me, peer) = participants(&state, &headers, &peer)?;

    state.chat.send(&me.identifier, &peer.identifier, &params.text)?;

    let messages = state.chat.transcript(&me.identifier, &peer.identifier);
    Ok((StatusCode::OK, Json(ChatResponse { success: true, messages })).into_response())
}

/// GET /chat/{id}
pub async fn transcript_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(peer): Path<String>,
) -> Result<Response, MarketError> {
    let (me, peer) = participants(&state, &headers, &peer)?;

    let messages = state.chat.transcript(&me.identifier, &peer.identifier);
    Ok((StatusCode::OK, Json(ChatResponse { success: true, messages })).into_response())
}

fn participants(
    state: &AppState,
    headers: &HeaderMap,
    peer: &str,
) -> Result<(Account, Account), MarketError> {
    let me = state
        .sessions
        .resolve_user(session_token(headers), state.store.as_ref())?;
    let peer = state
        .store
        .find_by_identifier(peer)?
        .ok_or_else(|| MarketError::NotFound(peer.to_string()))?;

    Ok((me, peer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::GenderCategory;

    fn seed(state: &AppState) -> String {
        state
            .lifecycle
            .register("Rina", "+880111", "pw", GenderCategory::Female)
            .unwrap();
        state
            .lifecycle
            .register("Sam", "+880222", "pw", GenderCategory::Male)
            .unwrap();
        state.sessions.start_user_session("+880222")
    }

    #[tokio::test]
    async fn test_send_and_read() {
        let state = AppState::in_memory();
        let sam = seed(&state);

        let response = send_chat_handler(
            State(state.clone()),
            AppState::bearer(&sam),
            Path("+880111".to_string()),
            Json(ChatParams {
                text: "hello".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let model = state.sessions.start_user_session("+880111");
        let response = transcript_handler(
            State(state.clone()),
            AppState::bearer(&model),
            Path("+880222".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.chat.transcript("+880111", "+880222").len(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_and_unknown_peer() {
        let state = AppState::in_memory();
        let sam = seed(&state);

        let result = send_chat_handler(
            State(state.clone()),
            AppState::bearer(&sam),
            Path("+880111".to_string()),
            Json(ChatParams {
                text: "  ".to_string(),
            }),
        )
        .await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::BAD_REQUEST);

        let result = transcript_handler(
            State(state.clone()),
            AppState::bearer(&sam),
            Path("+880999".to_string()),
        )
        .await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::NOT_FOUND);
    }
}
