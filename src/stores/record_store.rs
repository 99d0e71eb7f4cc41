use crate::core::error::{MarketError, StoreError};
use crate::models::account::Account;
use std::sync::Mutex;

/// Durable mapping of identifier to account, kept in insertion order.
///
/// Every operation works on the whole collection; there is no partial update.
pub trait RecordStore: Send + Sync {
    /// All accounts in insertion order
    fn list(&self) -> Result<Vec<Account>, StoreError>;

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|acc| acc.identifier == identifier))
    }

    /// Insert if the identifier is unseen, otherwise replace in place
    fn upsert(&self, account: Account) -> Result<(), StoreError>;

    /// Returns the removed account if it existed
    fn remove(&self, identifier: &str) -> Result<Option<Account>, StoreError>;

    /// Run `f` over the whole collection while holding the store's write lock.
    /// Changes are kept only when `f` returns true.
    fn transact(&self, f: &mut dyn FnMut(&mut Vec<Account>) -> bool) -> Result<(), StoreError>;
}

impl dyn RecordStore + '_ {
    /// Add `account` unless its identifier is taken; false when it was
    pub fn insert_new(&self, account: Account) -> Result<bool, StoreError> {
        let mut pending = Some(account);
        let mut inserted = false;

        self.transact(&mut |accounts| {
            let Some(account) = pending.take() else {
                return false;
            };
            if accounts.iter().any(|acc| acc.identifier == account.identifier) {
                return false;
            }
            accounts.push(account);
            inserted = true;
            true
        })?;

        Ok(inserted)
    }

    /// Read, check and rewrite one account as a single step.
    ///
    /// `f` works on a copy; the stored record changes only if it returns Ok.
    pub fn update<T>(
        &self,
        identifier: &str,
        f: impl FnOnce(&mut Account) -> Result<T, MarketError>,
    ) -> Result<T, MarketError> {
        let mut f = Some(f);
        let mut outcome = None;

        self.transact(&mut |accounts| {
            let Some(f) = f.take() else {
                return false;
            };
            let Some(slot) = accounts.iter_mut().find(|acc| acc.identifier == identifier) else {
                outcome = Some(Err(MarketError::NotFound(identifier.to_string())));
                return false;
            };

            let mut draft = slot.clone();
            match f(&mut draft) {
                Ok(value) => {
                    *slot = draft;
                    outcome = Some(Ok(value));
                    true
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    false
                }
            }
        })?;

        outcome.unwrap_or_else(|| Err(MarketError::NotFound(identifier.to_string())))
    }
}

/// Replace-or-append on an in-memory collection, shared by every store
pub(crate) fn upsert_into(accounts: &mut Vec<Account>, account: Account) {
    match accounts
        .iter_mut()
        .find(|acc| acc.identifier == account.identifier)
    {
        Some(slot) => *slot = account,
        None => accounts.push(account),
    }
}

pub(crate) fn remove_from(accounts: &mut Vec<Account>, identifier: &str) -> Option<Account> {
    let idx = accounts.iter().position(|acc| acc.identifier == identifier)?;
    Some(accounts.remove(idx))
}

/// Process-local store, used by tests and when no storage path is configured
pub struct MemoryRecordStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Account>> {
        // A panic mid-write cannot leave the Vec half-updated, so poison is ignored
        self.accounts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.lock().clone())
    }

    fn upsert(&self, account: Account) -> Result<(), StoreError> {
        upsert_into(&mut self.lock(), account);
        Ok(())
    }

    fn remove(&self, identifier: &str) -> Result<Option<Account>, StoreError> {
        Ok(remove_from(&mut self.lock(), identifier))
    }

    fn transact(&self, f: &mut dyn FnMut(&mut Vec<Account>) -> bool) -> Result<(), StoreError> {
        let mut accounts = self.lock();
        let mut draft = accounts.clone();
        if f(&mut draft) {
            *accounts = draft;
        }
        Ok(())
    }
}
