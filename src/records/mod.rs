//! # Records Module
//!
//! The user record model and the store adapters that persist it.
//!
//! - [`RecordStore`] - async adapter contract
//! - [`FirebaseRecordStore`] - Firebase Realtime Database over REST
//! - [`InMemoryRecordStore`] - process-local store for development and tests

mod errors;
mod firebase;
mod memory;
mod model;
mod store;

pub use errors::{StoreError, StoreResult};
pub use firebase::{decode_collection, FirebaseConfig, FirebaseRecordStore};
pub use memory::InMemoryRecordStore;
pub use model::{
    fold_name, Record, RecordMap, RecordPatch, StorageKey, NAME_FIELD, SECRET_FIELD,
    USERNAME_FIELD,
};
pub use store::RecordStore;
