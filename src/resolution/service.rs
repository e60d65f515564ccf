//! # Resolution Service
//!
//! The user operations on top of a [`RecordStore`].
//!
//! Clients address records by `name`, which is neither unique nor the
//! storage key. Update and delete therefore run in two phases:
//!
//! 1. Resolve: find the keys of records carrying the name
//! 2. Mutate: patch or remove by key
//!
//! The store has no way to make the pair atomic. Within this process the
//! sequence runs under a per-name lock; a writer in another process can
//! still rename or delete a record between the two phases.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::records::{RecordMap, RecordStore, StorageKey, NAME_FIELD};

use super::errors::{RecordError, RecordResult};
use super::locks::NameLocks;
use super::policy::{NameMatching, ResolutionConfig, Selection};
use super::requests::{CreateUserRequest, DeleteUserRequest, ListQuery, UpdateUserRequest};

/// Result of an update or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    /// Name the operation targeted
    pub name: String,

    /// Keys that were mutated
    pub affected: Vec<StorageKey>,

    /// Matching records left untouched by the ambiguity policy
    pub skipped: usize,
}

/// User record operations
pub struct ResolutionService {
    store: Arc<dyn RecordStore>,
    config: ResolutionConfig,
    locks: NameLocks,
}

impl ResolutionService {
    pub fn new(store: Arc<dyn RecordStore>, config: ResolutionConfig) -> Self {
        Self {
            store,
            config,
            locks: NameLocks::new(),
        }
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// List the collection, optionally filtered by case-insensitive name.
    ///
    /// Returns every match. An empty result is `NotFound`.
    pub async fn list(&self, query: &ListQuery) -> RecordResult<RecordMap> {
        let records = self.store.list().await?;

        let Some(name) = query.filter() else {
            if records.is_empty() {
                return Err(RecordError::NotFound("No records found".to_string()));
            }
            return Ok(records);
        };

        let matched: RecordMap = records
            .into_iter()
            .filter(|(_, r)| r.name_matches(name))
            .collect();

        if matched.is_empty() {
            return Err(RecordError::NotFound(
                "No records found with the given name".to_string(),
            ));
        }
        Ok(matched)
    }

    /// Insert a new record. Duplicate names are allowed.
    pub async fn create(&self, request: CreateUserRequest) -> RecordResult<StorageKey> {
        let record = request.validate()?;
        let key = self.store.insert(&record).await?;

        info!(event = "USER_CREATED", key = %key, name = %record.name, "record created");
        Ok(key)
    }

    /// Replace username and password on the record(s) carrying `name`
    pub async fn update(&self, request: UpdateUserRequest) -> RecordResult<MutationOutcome> {
        let (name, patch) = request.validate()?;
        let _guard = self.locks.acquire(&name).await;

        let selection = self.resolve(&name).await?;
        for (done, key) in selection.targets.iter().enumerate() {
            if let Err(e) = self.store.update_by_id(key, &patch).await {
                warn!(event = "USER_UPDATE_PARTIAL", name = %name, done, total = selection.targets.len(), "update stopped by store failure");
                return Err(e.into());
            }
        }

        info!(
            event = "USER_UPDATED",
            name = %name,
            affected = selection.targets.len(),
            skipped = selection.skipped,
            "record updated"
        );
        Ok(outcome(name, selection))
    }

    /// Remove the record(s) carrying `name`
    pub async fn delete(&self, request: DeleteUserRequest) -> RecordResult<MutationOutcome> {
        let name = request.validate()?;
        let _guard = self.locks.acquire(&name).await;

        let selection = self.resolve(&name).await?;
        for (done, key) in selection.targets.iter().enumerate() {
            if let Err(e) = self.store.delete_by_id(key).await {
                warn!(event = "USER_DELETE_PARTIAL", name = %name, done, total = selection.targets.len(), "delete stopped by store failure");
                return Err(e.into());
            }
        }

        info!(
            event = "USER_DELETED",
            name = %name,
            affected = selection.targets.len(),
            skipped = selection.skipped,
            "record deleted"
        );
        Ok(outcome(name, selection))
    }

    /// Find the records carrying `name` and apply the ambiguity policy
    async fn resolve(&self, name: &str) -> RecordResult<Selection> {
        let matches: RecordMap = match self.config.name_matching {
            NameMatching::Exact => self.store.find_by_field(NAME_FIELD, name).await?,
            NameMatching::CaseInsensitive => self
                .store
                .list()
                .await?
                .into_iter()
                .filter(|(_, r)| r.name_matches(name))
                .collect(),
        };

        if matches.is_empty() {
            return Err(RecordError::NotFound(format!(
                "No record found with name '{name}'"
            )));
        }

        if matches.len() > 1 {
            warn!(
                event = "RESOLVE_AMBIGUOUS",
                name = %name,
                matches = matches.len(),
                policy = ?self.config.ambiguity,
                "name matches several records"
            );
        }

        self.config.ambiguity.select(name, matches)
    }
}

fn outcome(name: String, selection: Selection) -> MutationOutcome {
    MutationOutcome {
        name,
        affected: selection.targets,
        skipped: selection.skipped,
    }
}
