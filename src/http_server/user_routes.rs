//! User HTTP Routes
//!
//! `/users` collection endpoints. All four methods share the path; update
//! and delete address records by name in the JSON body.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::records::RecordMap;
use crate::resolution::{
    CreateUserRequest, DeleteUserRequest, ListQuery, MutationOutcome, ResolutionService,
    UpdateUserRequest,
};

use super::errors::{ApiError, ApiResult};

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    /// Records changed by the request
    pub affected: usize,
    /// Records with the same name left unchanged
    pub skipped: usize,
}

impl MutationResponse {
    fn new(outcome: &MutationOutcome, verb: &str) -> Self {
        Self {
            message: format!("User with name: {} {}", outcome.name, verb),
            affected: outcome.affected.len(),
            skipped: outcome.skipped,
        }
    }
}

// ==================
// User Routes
// ==================

/// Create user routes
pub fn user_routes(service: Arc<ResolutionService>) -> Router {
    Router::new()
        .route(
            "/users",
            get(list_users_handler)
                .post(create_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(service)
}

// ==================
// Handlers
// ==================

async fn list_users_handler(
    State(service): State<Arc<ResolutionService>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<RecordMap>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let records = service.list(&query).await?;
    Ok(Json(records))
}

async fn create_user_handler(
    State(service): State<Arc<ResolutionService>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User added".to_string(),
        }),
    ))
}

async fn update_user_handler(
    State(service): State<Arc<ResolutionService>>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let outcome = service.update(request).await?;
    Ok(Json(MutationResponse::new(&outcome, "updated")))
}

async fn delete_user_handler(
    State(service): State<Arc<ResolutionService>>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let outcome = service.delete(request).await?;
    Ok(Json(MutationResponse::new(&outcome, "deleted")))
}
