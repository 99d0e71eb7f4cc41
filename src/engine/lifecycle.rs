use crate::core::error::MarketError;
use crate::models::account::{Account, GenderCategory, ModelProfile, Role, Standing};
use crate::stores::record_store::RecordStore;
use crate::validation::params::normalize_rate;
use std::sync::Arc;
use tracing::{info, warn};

/// Legal role transitions, enforced against the record store.
///
/// `standard_user` is terminal. `model_pending` becomes `model_active` on
/// approval or disappears on rejection/deletion. `model_active` only leaves
/// by deletion; its profile mutates freely.
///
/// Each operation checks and writes inside one store transaction, so a
/// concurrent writer can neither slip in between nor be overwritten.
pub struct Lifecycle {
    store: Arc<dyn RecordStore>,
    default_rate: f64,
}

impl Lifecycle {
    pub fn new(store: Arc<dyn RecordStore>, default_rate: f64) -> Self {
        Self {
            store,
            default_rate,
        }
    }

    pub fn register(
        &self,
        display_name: &str,
        identifier: &str,
        secret: &str,
        gender: GenderCategory,
    ) -> Result<Account, MarketError> {
        let account = Account::new(
            display_name.to_string(),
            identifier.to_string(),
            secret.to_string(),
            gender,
        );

        if !self.store.insert_new(account.clone())? {
            warn!(identifier = %identifier, "Registration with taken identifier");
            return Err(MarketError::DuplicateIdentifier(identifier.to_string()));
        }

        info!(
            identifier = %identifier,
            role = account.role().as_str(),
            "Account registered"
        );

        Ok(account)
    }

    /// Check a login attempt. Unknown identifier and wrong secret are
    /// indistinguishable to the caller.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Result<Account, MarketError> {
        match self.store.find_by_identifier(identifier)? {
            Some(account) if account.credential_secret == secret => Ok(account),
            _ => {
                warn!(identifier = %identifier, "Failed login");
                Err(MarketError::InvalidCredentials)
            }
        }
    }

    pub fn approve(&self, identifier: &str) -> Result<(), MarketError> {
        self.store.update(identifier, |account| {
            let role = account.role();
            let profile = match &mut account.standing {
                Standing::ModelPending { profile } => profile.take(),
                _ => {
                    warn!(identifier = %identifier, role = role.as_str(), "Approve on non-pending account");
                    return Err(MarketError::NotPending(identifier.to_string()));
                }
            };
            account.standing = Standing::ModelActive { profile };
            Ok(())
        })?;

        info!(identifier = %identifier, "Model approved");
        Ok(())
    }

    /// Rejection discards the registration outright, freeing the identifier
    pub fn reject(&self, identifier: &str) -> Result<(), MarketError> {
        self.store
            .remove(identifier)?
            .ok_or_else(|| MarketError::NotFound(identifier.to_string()))?;

        info!(identifier = %identifier, "Registration rejected and deleted");
        Ok(())
    }

    /// Replace the model's profile wholesale. A `None` photo keeps the stored one.
    pub fn save_model_profile(
        &self,
        identifier: &str,
        rate_per_minute: Option<f64>,
        availability_windows: String,
        photo_reference: Option<String>,
        is_online: bool,
    ) -> Result<Account, MarketError> {
        let default_rate = self.default_rate;
        let account = self.store.update(identifier, |account| {
            let slot = match &mut account.standing {
                Standing::ModelActive { profile } => profile,
                _ => return Err(MarketError::NotActiveModel(identifier.to_string())),
            };

            let photo_reference =
                photo_reference.or_else(|| slot.as_ref().and_then(|p| p.photo_reference.clone()));

            *slot = Some(ModelProfile {
                photo_reference,
                rate_per_minute: normalize_rate(rate_per_minute, default_rate),
                availability_windows,
                is_online,
            });
            Ok(account.clone())
        })?;

        info!(
            identifier = %identifier,
            is_online = is_online,
            "Model profile saved"
        );

        Ok(account)
    }

    /// Admin override of the online flag, creating an empty profile if needed
    pub fn force_set_online(&self, identifier: &str, value: bool) -> Result<Account, MarketError> {
        let default_rate = self.default_rate;
        let account = self.store.update(identifier, |account| {
            let slot = account
                .profile_slot_mut()
                .ok_or_else(|| MarketError::NotModel(identifier.to_string()))?;
            slot.get_or_insert_with(|| ModelProfile::shell(default_rate))
                .is_online = value;
            Ok(account.clone())
        })?;

        info!(
            identifier = %identifier,
            online = value,
            role = account.role().as_str(),
            "Online state forced by admin"
        );

        Ok(account)
    }

    pub fn delete_account(&self, identifier: &str) -> Result<(), MarketError> {
        let removed = self
            .store
            .remove(identifier)?
            .ok_or_else(|| MarketError::NotFound(identifier.to_string()))?;

        info!(
            identifier = %identifier,
            role = removed.role().as_str(),
            "Account deleted"
        );
        Ok(())
    }

    /// Which dashboard an account sees after login
    pub fn dashboard_for(account: &Account) -> &'static str {
        match account.role() {
            Role::StandardUser => "user",
            Role::ModelPending => "model_pending",
            Role::ModelActive => "model",
        }
    }

}
