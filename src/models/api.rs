use crate::engine::calls::{CallHandle, CallUpdate};
use crate::engine::chat::ChatMessage;
use crate::models::account::{Account, GenderCategory, ModelProfile, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Account as shown to clients; the credential never leaves the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub identifier: String,
    pub display_name: String,
    pub gender: GenderCategory,
    pub role: Role,
    pub profile: Option<ModelProfile>,
    pub gift_total: f64,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            identifier: account.identifier.clone(),
            display_name: account.display_name.clone(),
            gender: account.gender,
            role: account.role(),
            profile: account.profile().cloned(),
            gift_total: account.gift_total,
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub success: bool,
    pub account: AccountView,
}

impl AccountResponse {
    pub fn new(account: &Account) -> Self {
        Self {
            success: true,
            account: account.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub success: bool,
    pub accounts: Vec<AccountView>,
}

impl AccountListResponse {
    pub fn new(accounts: impl Iterator<Item = Account>) -> Self {
        Self {
            success: true,
            accounts: accounts.map(AccountView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    /// Which dashboard the client should show
    pub dashboard: String,
    pub account: Option<AccountView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub dashboard: String,
    pub account: Option<AccountView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallResponse {
    pub success: bool,
    pub call_id: u64,
    pub target: String,
    pub minutes: u32,
    pub total_charge: f64,
    pub remaining_seconds: u32,
    pub remaining: String,
    pub ended: bool,
}

impl CallResponse {
    pub fn new(handle: &CallHandle) -> Self {
        let CallUpdate {
            remaining_seconds,
            remaining,
            ended,
        } = handle.snapshot();

        Self {
            success: true,
            call_id: handle.id,
            target: handle.target.clone(),
            minutes: handle.minutes,
            total_charge: handle.total_charge,
            remaining_seconds,
            remaining,
            ended,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GiftResponse {
    pub success: bool,
    pub target: String,
    pub amount: f64,
    pub gift_total: f64,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub messages: Vec<ChatMessage>,
}
