// Application state (AppState)

use crate::core::config::Config;
use crate::engine::calls::CallEngine;
use crate::engine::chat::ChatLog;
use crate::engine::directory::Directory;
use crate::engine::gifts::GiftLedger;
use crate::engine::lifecycle::Lifecycle;
use crate::metrics::collector::Metrics;
use crate::stores::record_store::RecordStore;
use crate::stores::session_store::SessionManager;
use std::sync::Arc;

/// Shared application state
///
/// Every engine reads and writes through the same injected record store.
#[derive(Clone)]
pub struct AppState {
    /// Durable account records
    pub store: Arc<dyn RecordStore>,

    /// Who is acting, per browsing context
    pub sessions: Arc<SessionManager>,

    /// Registration, approval, rejection, profile and online changes
    pub lifecycle: Arc<Lifecycle>,

    /// Filtered account views
    pub directory: Arc<Directory>,

    /// Simulated paid calls
    pub calls: Arc<CallEngine>,

    pub gifts: Arc<GiftLedger>,

    pub chat: Arc<ChatLog>,

    pub metrics: Arc<Metrics>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let config = Arc::new(config);
        let default_rate = config.market.default_rate_per_minute;

        Self {
            lifecycle: Arc::new(Lifecycle::new(Arc::clone(&store), default_rate)),
            directory: Arc::new(Directory::new(Arc::clone(&store))),
            calls: Arc::new(CallEngine::new(
                Arc::clone(&store),
                default_rate,
                config.market.max_call_minutes,
            )),
            gifts: Arc::new(GiftLedger::new(Arc::clone(&store))),
            chat: Arc::new(ChatLog::new()),
            sessions: Arc::new(SessionManager::new()),
            metrics: Arc::new(Metrics::new()),
            store,
            config,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state over an in-memory store with default settings
    pub(crate) fn in_memory() -> Arc<Self> {
        let config = Config::from_toml("[server]\nport = 8080\n").unwrap();
        let store = Arc::new(crate::stores::record_store::MemoryRecordStore::new());
        Arc::new(Self::new(config, store))
    }

    /// Headers carrying a bearer session token
    pub(crate) fn bearer(token: &str) -> axum::http::HeaderMap {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers
    }
}
