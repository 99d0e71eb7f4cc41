// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, auth, calls, chat, gifts, models};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/admin/login", post(auth::admin_login_handler))
        .route("/logout", post(auth::logout_handler))
        .route("/me", get(auth::me_handler))

        // Logged-in user endpoints
        .route("/models/online", get(models::online_models_handler))
        .route("/me/profile", put(models::save_profile_handler))
        .route("/calls", post(calls::start_call_handler))
        .route("/calls/{id}", get(calls::call_status_handler))
        .route("/calls/{id}/end", post(calls::end_call_handler))
        .route("/gifts", post(gifts::gift_handler))
        .route(
            "/chat/{id}",
            get(chat::transcript_handler).post(chat::send_chat_handler),
        )

        // Admin endpoints (require admin session)
        .route("/admin/pending", get(admin::pending_handler))
        .route("/admin/models", get(admin::all_models_handler))
        .route("/admin/models/{id}/approve", post(admin::approve_handler))
        .route("/admin/models/{id}/reject", post(admin::reject_handler))
        .route("/admin/models/{id}/online", post(admin::force_online_handler))
        .route("/admin/accounts/{id}", delete(admin::delete_handler))
        .route("/admin/metrics", get(crate::handlers::metrics::metrics_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::{LoginResponse, MeResponse};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let router = build_router(AppState::in_memory());

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/register",
                None,
                json!({"name": "Rina", "mobile": "+880111", "password": "pw", "gender": "female"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/login",
                None,
                json!({"mobile": "+880111", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(login.dashboard, "model_pending");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", login.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me: MeResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(me.dashboard, "model_pending");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_user_session() {
        let state = AppState::in_memory();
        let user = state.sessions.start_user_session("+880222");
        let router = build_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/admin/pending")
                    .header(header::AUTHORIZATION, format!("Bearer {}", user))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = build_router(AppState::in_memory());
        let response = router
            .oneshot(Request::builder().uri("/no-such-page").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
