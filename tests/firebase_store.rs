//! Firebase Store Tests
//!
//! Runs the Firebase REST adapter against a fake Realtime Database served
//! by axum on an ephemeral port. The fake mimics the REST semantics the
//! adapter relies on:
//! - `null` for an absent collection, `{}` for an empty query result
//! - push keys returned as `{"name": <key>}`
//! - PATCH merges, DELETE removes
//! - `auth` query parameter checked when a token is configured

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use rollcall::http_server::ApiError;
use rollcall::records::{
    FirebaseConfig, FirebaseRecordStore, Record, RecordPatch, RecordStore, StoreError,
};
use rollcall::resolution::{
    CreateUserRequest, DeleteUserRequest, ListQuery, NameMatching, RecordError,
    ResolutionConfig, ResolutionService, UpdateUserRequest,
};

// =============================================================================
// Fake Realtime Database
// =============================================================================

#[derive(Default)]
struct FakeDb {
    nodes: Mutex<BTreeMap<String, Value>>,
    next: AtomicU64,
    token: Option<String>,
}

type Shared = Arc<FakeDb>;
type Params = Query<HashMap<String, String>>;

impl FakeDb {
    fn authorize(&self, params: &HashMap<String, String>) -> Result<(), StatusCode> {
        match &self.token {
            Some(token) if params.get("auth") != Some(token) => Err(StatusCode::UNAUTHORIZED),
            _ => Ok(()),
        }
    }

    fn snapshot(&self) -> BTreeMap<String, Value> {
        self.nodes.lock().unwrap().clone()
    }
}

fn key_of(file: &str) -> Result<String, StatusCode> {
    file.strip_suffix(".json")
        .map(str::to_string)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_collection(
    State(db): State<Shared>,
    Query(params): Params,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(&params)?;
    let nodes = db.snapshot();

    match (params.get("orderBy"), params.get("equalTo")) {
        (Some(field), Some(value)) => {
            let field: String = serde_json::from_str(field).map_err(|_| StatusCode::BAD_REQUEST)?;
            let value: Value = serde_json::from_str(value).map_err(|_| StatusCode::BAD_REQUEST)?;
            let matched: Map<String, Value> = nodes
                .into_iter()
                .filter(|(_, node)| node.get(&field) == Some(&value))
                .collect();
            Ok(Json(Value::Object(matched)))
        }
        _ if nodes.is_empty() => Ok(Json(Value::Null)),
        _ => Ok(Json(Value::Object(nodes.into_iter().collect()))),
    }
}

async fn push_record(
    State(db): State<Shared>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(&params)?;
    let key = format!("-F{:06}", db.next.fetch_add(1, Ordering::SeqCst));
    db.nodes.lock().unwrap().insert(key.clone(), body);
    Ok(Json(json!({ "name": key })))
}

async fn patch_record(
    State(db): State<Shared>,
    Path(file): Path<String>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(&params)?;
    let key = key_of(&file)?;
    let Value::Object(fields) = body.clone() else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let mut nodes = db.nodes.lock().unwrap();
    let node = nodes.entry(key).or_insert_with(|| json!({}));
    if let Value::Object(existing) = node {
        existing.extend(fields);
    }
    Ok(Json(body))
}

async fn delete_record(
    State(db): State<Shared>,
    Path(file): Path<String>,
    Query(params): Params,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(&params)?;
    let key = key_of(&file)?;
    db.nodes.lock().unwrap().remove(&key);
    Ok(Json(Value::Null))
}

async fn spawn_fake(token: Option<&str>) -> (String, Shared) {
    let db = Arc::new(FakeDb {
        token: token.map(str::to_string),
        ..FakeDb::default()
    });

    let router = Router::new()
        .route("/users.json", get(get_collection).post(push_record))
        .route("/users/:file", patch(patch_record).delete(delete_record))
        .with_state(db.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), db)
}

fn store_for(url: &str, token: Option<&str>) -> FirebaseRecordStore {
    FirebaseRecordStore::new(FirebaseConfig {
        database_url: url.to_string(),
        collection: "users".to_string(),
        auth_token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

// =============================================================================
// Adapter Operations
// =============================================================================

#[tokio::test]
async fn test_list_absent_collection_is_empty() {
    let (url, _db) = spawn_fake(None).await;
    let store = store_for(&url, None);

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_returns_store_assigned_key() {
    let (url, db) = spawn_fake(None).await;
    let store = store_for(&url, None);

    let key = store.insert(&Record::new("Ana", "ana1", "p1")).await.unwrap();
    assert!(key.starts_with("-F"));

    let stored = db.snapshot();
    assert_eq!(
        stored[&key],
        json!({"name": "Ana", "username": "ana1", "password": "p1"})
    );

    let listed = store.list().await.unwrap();
    assert_eq!(listed[&key], Record::new("Ana", "ana1", "p1"));
}

#[tokio::test]
async fn test_find_by_field_uses_exact_equality() {
    let (url, _db) = spawn_fake(None).await;
    let store = store_for(&url, None);
    let ana = store.insert(&Record::new("Ana", "ana1", "p1")).await.unwrap();
    store.insert(&Record::new("ana", "ana2", "p2")).await.unwrap();
    store.insert(&Record::new("Budi", "budi", "p3")).await.unwrap();

    let matches = store.find_by_field("name", "Ana").await.unwrap();
    assert_eq!(matches.keys().collect::<Vec<_>>(), vec![&ana]);

    assert!(store.find_by_field("name", "Zed").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_by_id_patches_credentials_only() {
    let (url, db) = spawn_fake(None).await;
    let store = store_for(&url, None);
    let key = store.insert(&Record::new("Ana", "ana1", "p1")).await.unwrap();

    store
        .update_by_id(&key, &RecordPatch::new("ana2", "p2"))
        .await
        .unwrap();

    assert_eq!(
        db.snapshot()[&key],
        json!({"name": "Ana", "username": "ana2", "password": "p2"})
    );
}

#[tokio::test]
async fn test_delete_by_id_removes_record() {
    let (url, db) = spawn_fake(None).await;
    let store = store_for(&url, None);
    let key = store.insert(&Record::new("Ana", "ana1", "p1")).await.unwrap();
    let other = store.insert(&Record::new("Budi", "b", "p")).await.unwrap();

    store.delete_by_id(&key).await.unwrap();

    let remaining = db.snapshot();
    assert!(!remaining.contains_key(&key));
    assert!(remaining.contains_key(&other));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_auth_token_is_sent() {
    let (url, _db) = spawn_fake(Some("s3cret")).await;

    let authorized = store_for(&url, Some("s3cret"));
    authorized.insert(&Record::new("Ana", "a", "p")).await.unwrap();
    assert_eq!(authorized.list().await.unwrap().len(), 1);

    let anonymous = store_for(&url, None);
    let err = anonymous.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = store_for(&format!("http://{}", addr), None);
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

/// The auth token rides in the query string; failures must not echo it.
#[tokio::test]
async fn test_transport_error_omits_auth_token() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}", addr);
    let store = store_for(&url, Some("db-secret-token"));
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
    assert!(!err.to_string().contains("db-secret-token"));

    let service = ResolutionService::new(
        Arc::new(store_for(&url, Some("db-secret-token"))),
        ResolutionConfig::default(),
    );
    let err = service.list(&ListQuery::default()).await.unwrap_err();
    let logged = ApiError::from(err).to_string();
    assert!(logged.starts_with("Store unavailable"));
    assert!(!logged.contains("db-secret-token"));
}

// =============================================================================
// Service over Firebase
// =============================================================================

#[tokio::test]
async fn test_service_scenario_with_exact_matching() {
    let (url, db) = spawn_fake(None).await;
    let service = ResolutionService::new(
        Arc::new(store_for(&url, None)),
        ResolutionConfig {
            name_matching: NameMatching::Exact,
            ..ResolutionConfig::default()
        },
    );

    service
        .create(CreateUserRequest::new("Ana", "ana1", "p1"))
        .await
        .unwrap();

    let found = service.list(&ListQuery::by_name("ana")).await.unwrap();
    assert_eq!(found.len(), 1);

    service
        .update(UpdateUserRequest::new("Ana", "ana2", "p2"))
        .await
        .unwrap();
    let record = db.snapshot().into_values().next().unwrap();
    assert_eq!(record["username"], "ana2");

    let err = service.delete(DeleteUserRequest::new("ana")).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound(_)));

    service.delete(DeleteUserRequest::new("Ana")).await.unwrap();
    let err = service.list(&ListQuery::by_name("Ana")).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound(_)));
}

#[tokio::test]
async fn test_service_maps_store_failure() {
    let (url, _db) = spawn_fake(Some("s3cret")).await;
    let service = ResolutionService::new(
        Arc::new(store_for(&url, Some("wrong"))),
        ResolutionConfig::default(),
    );

    let err = service
        .create(CreateUserRequest::new("Ana", "a", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::StoreUnavailable(_)));
}
