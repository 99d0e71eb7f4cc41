use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::core::config::StorageConfig;
use crate::stores::file_store::FileRecordStore;
use crate::stores::record_store::{MemoryRecordStore, RecordStore};

/// Pick the record store from configuration and make sure it is readable
/// before the server accepts requests
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn RecordStore>> {
    if config.in_memory {
        info!("Using in-memory account store, nothing will be persisted");
        return Ok(Arc::new(MemoryRecordStore::new()));
    }

    let store = FileRecordStore::new(config.path.clone());
    let accounts = store
        .list()
        .context(format!("Failed to load accounts from {}", config.path.display()))?;

    info!(
        path = %config.path.display(),
        accounts = accounts.len(),
        "Account store loaded"
    );

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory_store() {
        let config = StorageConfig {
            path: "unused.json".into(),
            in_memory: true,
        };
        let store = open_store(&config).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_store_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            path: temp_dir.path().join("accounts.json"),
            in_memory: false,
        };
        let store = open_store(&config).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_store_refuses_corrupt_blob() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        fs::write(&path, "[{\"broken\"").unwrap();

        let config = StorageConfig {
            path,
            in_memory: false,
        };
        assert!(open_store(&config).is_err());
    }
}
