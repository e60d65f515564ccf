//! # Resolution Module
//!
//! List, create, update-by-name and delete-by-name over a record store,
//! including name resolution, the ambiguity policy and per-name locking.

mod errors;
mod locks;
mod policy;
mod requests;
mod service;

pub use errors::{RecordError, RecordResult};
pub use locks::{NameGuard, NameLocks};
pub use policy::{AmbiguityPolicy, NameMatching, ResolutionConfig, Selection};
pub use requests::{CreateUserRequest, DeleteUserRequest, ListQuery, UpdateUserRequest};
pub use service::{MutationOutcome, ResolutionService};
