//! # In-Memory Record Store
//!
//! Process-local store for development and tests. Keys come from a
//! monotonic sequence, so key order is insertion order just like Firebase
//! push IDs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::model::{Record, RecordMap, RecordPatch, StorageKey};
use super::store::RecordStore;

/// In-memory record store
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<RecordMap>,
    next_seq: AtomicU64,
    unavailable: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away. Every operation fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> StoreResult<RecordMap> {
        Ok(self.read()?.clone())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_key(&self) -> StorageKey {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        format!("-M{:018}", seq)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, RecordMap>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, RecordMap>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self) -> StoreResult<RecordMap> {
        self.check_available()?;
        Ok(self.read()?.clone())
    }

    async fn find_by_field(&self, field: &str, value: &str) -> StoreResult<RecordMap> {
        self.check_available()?;
        let records = self.read()?;
        Ok(records
            .iter()
            .filter(|(_, r)| r.field(field) == Some(value))
            .map(|(k, r)| (k.clone(), r.clone()))
            .collect())
    }

    async fn insert(&self, record: &Record) -> StoreResult<StorageKey> {
        self.check_available()?;
        let key = self.next_key();
        self.write()?.insert(key.clone(), record.clone());
        Ok(key)
    }

    // Patching a missing key is a no-op here.
    async fn update_by_id(&self, key: &str, patch: &RecordPatch) -> StoreResult<()> {
        self.check_available()?;
        if let Some(record) = self.write()?.get_mut(key) {
            record.apply(patch);
        }
        Ok(())
    }

    async fn delete_by_id(&self, key: &str) -> StoreResult<()> {
        self.check_available()?;
        self.write()?.remove(key);
        Ok(())
    }
}
