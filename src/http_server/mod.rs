//! # HTTP Server Module
//!
//! Axum server exposing the user collection.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/users` - List/filter (GET), create (POST), update (PUT), delete (DELETE)

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod user_routes;

pub use config::{HttpConfigError, HttpServerConfig};
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, HttpServer};
