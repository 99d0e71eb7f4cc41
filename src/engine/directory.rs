use crate::core::error::StoreError;
use crate::models::account::{Account, Role};
use crate::stores::record_store::RecordStore;
use std::sync::Arc;

/// Read-side views over the record store.
///
/// Each view filters a fresh snapshot lazily; the returned iterator can be
/// cloned to walk it again. Nothing is cached between calls.
pub struct Directory {
    store: Arc<dyn RecordStore>,
}

impl Directory {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Registrations awaiting admin approval, in store order
    pub fn pending_models(
        &self,
    ) -> Result<impl Iterator<Item = Account> + Clone, StoreError> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|acc| acc.role() == Role::ModelPending))
    }

    /// Every model-eligible account, pending or active, for admin oversight
    pub fn all_model_accounts(
        &self,
    ) -> Result<impl Iterator<Item = Account> + Clone, StoreError> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|acc| acc.gender.is_model_eligible()))
    }

    /// The only list standard users see: approved models switched online
    pub fn online_models(
        &self,
    ) -> Result<impl Iterator<Item = Account> + Clone, StoreError> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(Account::is_listed_online))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lifecycle::Lifecycle;
    use crate::models::account::GenderCategory;
    use crate::stores::record_store::MemoryRecordStore;

    fn setup() -> (Lifecycle, Directory) {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        (
            Lifecycle::new(store.clone(), 10.0),
            Directory::new(store),
        )
    }

    fn ids(iter: impl Iterator<Item = Account>) -> Vec<String> {
        iter.map(|a| a.identifier).collect()
    }

    #[test]
    fn test_pending_and_all_models() {
        let (lifecycle, directory) = setup();
        lifecycle.register("A", "1", "pw", GenderCategory::Female).unwrap();
        lifecycle.register("B", "2", "pw", GenderCategory::Male).unwrap();
        lifecycle.register("C", "3", "pw", GenderCategory::Female).unwrap();

        assert_eq!(ids(directory.pending_models().unwrap()), vec!["1", "3"]);
        assert_eq!(ids(directory.all_model_accounts().unwrap()), vec!["1", "3"]);

        lifecycle.approve("1").unwrap();
        assert_eq!(ids(directory.pending_models().unwrap()), vec!["3"]);
        assert_eq!(ids(directory.all_model_accounts().unwrap()), vec!["1", "3"]);
    }

    #[test]
    fn test_online_models_requires_both_conditions() {
        let (lifecycle, directory) = setup();
        lifecycle.register("A", "1", "pw", GenderCategory::Female).unwrap();

        // Online but still pending
        lifecycle.force_set_online("1", true).unwrap();
        assert_eq!(directory.online_models().unwrap().count(), 0);

        // Active and online
        lifecycle.approve("1").unwrap();
        assert_eq!(ids(directory.online_models().unwrap()), vec!["1"]);

        // Active but offline
        lifecycle.force_set_online("1", false).unwrap();
        assert_eq!(directory.online_models().unwrap().count(), 0);

        lifecycle
            .save_model_profile("1", Some(15.0), String::new(), None, true)
            .unwrap();
        assert_eq!(ids(directory.online_models().unwrap()), vec!["1"]);

        lifecycle.delete_account("1").unwrap();
        assert_eq!(directory.online_models().unwrap().count(), 0);
    }

    #[test]
    fn test_views_are_restartable() {
        let (lifecycle, directory) = setup();
        lifecycle.register("A", "1", "pw", GenderCategory::Female).unwrap();
        lifecycle.register("B", "2", "pw", GenderCategory::Female).unwrap();

        let view = directory.pending_models().unwrap();
        let first: Vec<_> = view.clone().collect();
        let second: Vec<_> = view.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_views_are_fresh_per_call() {
        let (lifecycle, directory) = setup();
        assert_eq!(directory.pending_models().unwrap().count(), 0);

        lifecycle.register("A", "1", "pw", GenderCategory::Female).unwrap();
        assert_eq!(directory.pending_models().unwrap().count(), 1);
    }
}
