//! # Record Model
//!
//! User records as persisted in the collection. A record lives under an
//! opaque storage key assigned by the store; `name` is a label, not an
//! identity, and may repeat across any number of records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the store at insertion
pub type StorageKey = String;

/// Records keyed by storage key.
///
/// Ordered lexicographically by key. Firebase push IDs sort in creation
/// order, so the first entry is the oldest record.
pub type RecordMap = BTreeMap<StorageKey, Record>;

/// Stored field holding the record's name
pub const NAME_FIELD: &str = "name";

/// Stored field holding the record's username
pub const USERNAME_FIELD: &str = "username";

/// Stored field holding the record's secret
pub const SECRET_FIELD: &str = "password";

/// A user record
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Business-facing label (not unique). Nodes written by the legacy
    /// client store it as `nama`; it is always written back as `name`.
    #[serde(alias = "nama")]
    pub name: String,

    /// Login name
    pub username: String,

    /// Password, stored and returned as an opaque string
    #[serde(rename = "password")]
    pub secret: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Case-insensitive comparison of this record's name against `name`
    pub fn name_matches(&self, name: &str) -> bool {
        fold_name(&self.name) == fold_name(name)
    }

    /// Value of a stored field by its wire name
    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            NAME_FIELD => Some(&self.name),
            USERNAME_FIELD => Some(&self.username),
            SECRET_FIELD => Some(&self.secret),
            _ => None,
        }
    }

    /// Apply an in-place patch. Name and identity are untouched.
    pub fn apply(&mut self, patch: &RecordPatch) {
        self.username = patch.username.clone();
        self.secret = patch.secret.clone();
    }
}

/// Debug output never includes the secret.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Replacement credentials for an existing record
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RecordPatch {
    pub username: String,
    #[serde(rename = "password")]
    pub secret: String,
}

impl RecordPatch {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for RecordPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordPatch")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Case-folded form of a name, used for case-insensitive comparison
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}
