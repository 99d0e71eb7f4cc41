use crate::core::error::MarketError;
use crate::models::account::Account;
use crate::models::session::{Session, SessionKind};
use crate::stores::record_store::RecordStore;
use crate::utils::auth::generate_token;
use crate::utils::time::current_timestamp;
use dashmap::DashMap;
use tracing::info;

/// Ephemeral sessions, one per browsing context, keyed by an opaque token
pub struct SessionManager {
    sessions: DashMap<String, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Start a session for an account and return its token
    pub fn start_user_session(&self, identifier: &str) -> String {
        let token = generate_token();
        let kind = SessionKind::User {
            identifier: identifier.to_string(),
        };
        self.sessions
            .insert(token.clone(), Session::new(kind, current_timestamp()));

        info!(identifier = %identifier, "User session started");
        token
    }

    pub fn start_admin_session(&self) -> String {
        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            Session::new(SessionKind::Admin, current_timestamp()),
        );

        info!("Admin session started");
        token
    }

    pub fn current(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Ending an unknown or already ended session is a no-op
    pub fn end_session(&self, token: &str) -> bool {
        let ended = self.sessions.remove(token).is_some();
        if ended {
            info!("Session ended");
        }
        ended
    }

    /// Resolve the session's account against the store on every call, so
    /// admin edits to a logged-in account are seen immediately
    pub fn resolve_user(
        &self,
        token: Option<&str>,
        store: &dyn RecordStore,
    ) -> Result<Account, MarketError> {
        let session = token
            .and_then(|t| self.current(t))
            .ok_or(MarketError::Unauthenticated)?;

        let identifier = session.user_identifier().ok_or(MarketError::Forbidden)?;

        store
            .find_by_identifier(identifier)?
            .ok_or(MarketError::Unauthenticated)
    }

    pub fn require_admin(&self, token: Option<&str>) -> Result<Session, MarketError> {
        let session = token
            .and_then(|t| self.current(t))
            .ok_or(MarketError::Unauthenticated)?;

        if session.is_admin() {
            Ok(session)
        } else {
            Err(MarketError::Forbidden)
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
