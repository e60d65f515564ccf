//! # Resolution Policies
//!
//! How a name is matched against stored records, and what happens when it
//! matches more than one.

use serde::{Deserialize, Serialize};

use crate::records::{RecordMap, StorageKey};

use super::errors::{RecordError, RecordResult};

/// What update/delete do when a name matches several records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Fail with `Ambiguous` and touch nothing
    #[default]
    #[serde(alias = "reject_if_ambiguous")]
    Reject,

    /// Mutate every matching record
    #[serde(alias = "mutate_all")]
    All,

    /// Mutate only the first match in key order, leave the rest
    #[serde(alias = "first_match")]
    First,
}

/// How update/delete compare the requested name with stored names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// Same comparison as the list filter. Resolves from a full listing.
    #[default]
    CaseInsensitive,

    /// The store's native equality query. Case-sensitive, unlike the list
    /// filter.
    Exact,
}

/// Resolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,

    #[serde(default)]
    pub name_matching: NameMatching,
}

/// Records chosen for mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Keys to mutate, in key order
    pub targets: Vec<StorageKey>,

    /// Matches deliberately left untouched
    pub skipped: usize,
}

impl AmbiguityPolicy {
    /// Choose the records to mutate out of a non-empty set of matches
    pub fn select(&self, name: &str, matches: RecordMap) -> RecordResult<Selection> {
        let total = matches.len();
        let mut keys = matches.into_keys();

        match self {
            _ if total <= 1 => Ok(Selection {
                targets: keys.collect(),
                skipped: 0,
            }),
            AmbiguityPolicy::Reject => Err(RecordError::Ambiguous {
                name: name.to_string(),
                matches: total,
            }),
            AmbiguityPolicy::All => Ok(Selection {
                targets: keys.collect(),
                skipped: 0,
            }),
            AmbiguityPolicy::First => Ok(Selection {
                targets: keys.next().into_iter().collect(),
                skipped: total - 1,
            }),
        }
    }
}
