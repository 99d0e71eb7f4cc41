use serde::Serialize;

/// Who is acting in a browsing context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionKind {
    /// Only the identifier is kept; the account is re-read on every use
    User { identifier: String },
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(flatten)]
    pub kind: SessionKind,
    /// Unix timestamp of login
    pub created_at: i64,
}

impl Session {
    pub fn new(kind: SessionKind, created_at: i64) -> Self {
        Self { kind, created_at }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.kind, SessionKind::Admin)
    }

    pub fn user_identifier(&self) -> Option<&str> {
        match &self.kind {
            SessionKind::User { identifier } => Some(identifier),
            SessionKind::Admin => None,
        }
    }
}
