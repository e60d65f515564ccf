//! # Firebase Record Store
//!
//! Record store backed by the Firebase Realtime Database REST API.
//!
//! | Operation       | Request                                                  |
//! |-----------------|----------------------------------------------------------|
//! | `list`          | `GET {base}/{collection}.json`                           |
//! | `find_by_field` | `GET {base}/{collection}.json?orderBy=..&equalTo=..`     |
//! | `insert`        | `POST {base}/{collection}.json` → `{"name": "<key>"}`    |
//! | `update_by_id`  | `PATCH {base}/{collection}/{key}.json`                   |
//! | `delete_by_id`  | `DELETE {base}/{collection}/{key}.json`                  |
//!
//! Equality queries need an `.indexOn` rule for the queried field in the
//! database rules, otherwise Firebase answers 400.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::{StoreError, StoreResult};
use super::model::{Record, RecordMap, RecordPatch, StorageKey};
use super::store::RecordStore;

/// Connection settings for a Firebase database
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://<project>-default-rtdb.firebaseio.com`
    pub database_url: String,

    /// Path of the user collection under the root
    pub collection: String,

    /// Database secret or ID token, sent as the `auth` query parameter
    pub auth_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Body returned by a push (`POST`)
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Firebase REST record store
pub struct FirebaseRecordStore {
    client: Client,
    database_url: String,
    collection: String,
    auth_token: Option<String>,
}

impl FirebaseRecordStore {
    /// Build a store with its own HTTP client
    pub fn new(config: FirebaseConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            database_url: config.database_url.trim_end_matches('/').to_string(),
            collection: config.collection.trim_matches('/').to_string(),
            auth_token: config.auth_token,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, self.collection)
    }

    fn record_url(&self, key: &str) -> StoreResult<String> {
        // Firebase forbids these in keys; a slash would also escape the collection.
        if key.is_empty() || key.contains(['/', '.', '#', '$', '[', ']']) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(format!("{}/{}/{}.json", self.database_url, self.collection, key))
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(scrub(e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        Ok(response)
    }

    async fn read_collection(&self, request: RequestBuilder) -> StoreResult<RecordMap> {
        let response = self.send(request).await?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(scrub(e)))?;
        decode_collection(value)
    }
}

#[async_trait]
impl RecordStore for FirebaseRecordStore {
    async fn list(&self) -> StoreResult<RecordMap> {
        debug!(collection = %self.collection, "listing collection");
        self.read_collection(self.client.get(self.collection_url()))
            .await
    }

    async fn find_by_field(&self, field: &str, value: &str) -> StoreResult<RecordMap> {
        debug!(collection = %self.collection, field, "querying by field");
        let order_by = Value::String(field.to_string()).to_string();
        let equal_to = Value::String(value.to_string()).to_string();
        let request = self
            .client
            .get(self.collection_url())
            .query(&[("orderBy", order_by), ("equalTo", equal_to)]);
        self.read_collection(request).await
    }

    async fn insert(&self, record: &Record) -> StoreResult<StorageKey> {
        let request = self.client.post(self.collection_url()).json(record);
        let pushed: PushResponse = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(scrub(e)))?;
        Ok(pushed.name)
    }

    async fn update_by_id(&self, key: &str, patch: &RecordPatch) -> StoreResult<()> {
        let request = self.client.patch(self.record_url(key)?).json(patch);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_by_id(&self, key: &str) -> StoreResult<()> {
        let request = self.client.delete(self.record_url(key)?);
        self.send(request).await?;
        Ok(())
    }
}

/// Error text without the request URL, which carries the `auth` token.
fn scrub(e: reqwest::Error) -> String {
    e.without_url().to_string()
}

/// Decode a collection snapshot into records.
///
/// `null` is an absent collection. Arrays appear when every key is a small
/// integer; holes are `null`. Children that are not records are skipped.
pub fn decode_collection(value: Value) -> StoreResult<RecordMap> {
    let children: Vec<(String, Value)> = match value {
        Value::Null => return Ok(RecordMap::new()),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => {
            return Err(StoreError::Decode(format!(
                "expected an object, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = RecordMap::new();
    for (key, child) in children {
        match serde_json::from_value::<Record>(child) {
            Ok(record) => {
                records.insert(key, record);
            }
            Err(e) => {
                warn!(event = "STORE_RECORD_SKIPPED", key = %key, error = %e, "skipping malformed record");
            }
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
