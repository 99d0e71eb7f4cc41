use crate::core::error::StoreError;
use crate::models::account::Account;
use crate::stores::record_store::{remove_from, upsert_into, RecordStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Record store backed by a single JSON document on disk.
///
/// Every operation reads the whole blob, modifies it, and writes it back,
/// all under one mutex, so writers inside this process never interleave.
/// Two processes sharing the file follow last-writer-wins.
///
/// The file I/O is blocking and runs on the calling thread. Fine for a few
/// hundred accounts; a larger store would move it onto `spawn_blocking`.
pub struct FileRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<Vec<Account>, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            // Nothing saved yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&content).map_err(|e| {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Account store is malformed, refusing to overwrite it"
            );
            StoreError::Corrupt(e)
        })
    }

    fn save(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(accounts)?;

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Account>) -> T) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut accounts = self.load()?;
        let out = f(&mut accounts);
        self.save(&accounts)?;
        Ok(out)
    }
}

impl RecordStore for FileRecordStore {
    fn list(&self) -> Result<Vec<Account>, StoreError> {
        self.load()
    }

    fn upsert(&self, account: Account) -> Result<(), StoreError> {
        self.modify(|accounts| upsert_into(accounts, account))
    }

    fn remove(&self, identifier: &str) -> Result<Option<Account>, StoreError> {
        self.modify(|accounts| remove_from(accounts, identifier))
    }

    fn transact(&self, f: &mut dyn FnMut(&mut Vec<Account>) -> bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut accounts = self.load()?;
        if f(&mut accounts) {
            self.save(&accounts)?;
        }
        Ok(())
    }
}
