//! rollcall - user records over a remote document store
//!
//! Records live under store-assigned keys but clients address them by a
//! non-unique `name`, so update and delete resolve the name to keys before
//! mutating.
//!
//! - [`records`] - record model and store adapters
//! - [`resolution`] - the list/create/update/delete operations
//! - [`http_server`] - Axum routes for `/users`
//! - [`cli`] - configuration and process entry

pub mod cli;
pub mod http_server;
pub mod records;
pub mod resolution;
