//! # Record Store Trait
//!
//! Async interface to the document store holding the user collection.
//! Implementations own no business rules: no validation, no ambiguity
//! handling, no existence checks before writes.

use async_trait::async_trait;

use super::errors::StoreResult;
use super::model::{Record, RecordMap, RecordPatch, StorageKey};

/// Record store adapter
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the whole collection. Empty map if the collection is absent.
    async fn list(&self) -> StoreResult<RecordMap>;

    /// Fetch records whose `field` equals `value` exactly (case-sensitive)
    async fn find_by_field(&self, field: &str, value: &str) -> StoreResult<RecordMap>;

    /// Insert a record and return the key the store assigned to it
    async fn insert(&self, record: &Record) -> StoreResult<StorageKey>;

    /// Patch the record stored under `key`.
    ///
    /// The outcome for a key that does not exist is store-defined.
    async fn update_by_id(&self, key: &str, patch: &RecordPatch) -> StoreResult<()>;

    /// Remove the record stored under `key`
    async fn delete_by_id(&self, key: &str) -> StoreResult<()>;
}
