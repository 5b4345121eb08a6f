//! In-memory implementation of the document-store HTTP surface.
//!
//! Serves the bucket ⊃ collection ⊃ record hierarchy with the `{"data": ...}`
//! success envelope and `{errno, message, code, error}` error bodies.
//! Integration tests run it on a random port; `main.rs` serves it standalone.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored record, as served inside the envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub last_modified: i64,
}

/// Create/replace request body for a record.
#[derive(Debug, Deserialize, Default)]
pub struct RecordBody {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Bucket and collection metadata.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceMeta {
    pub id: String,
    pub last_modified: i64,
}

#[derive(Default)]
struct Collection {
    meta_last_modified: i64,
    records: HashMap<String, Record>,
}

#[derive(Default)]
struct Bucket {
    meta_last_modified: i64,
    collections: HashMap<String, Collection>,
}

#[derive(Default)]
struct Store {
    epoch: i64,
    buckets: HashMap<String, Bucket>,
}

impl Store {
    /// Next `last_modified` stamp: wall-clock milliseconds, forced strictly
    /// increasing per store.
    fn tick(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        self.epoch = if now > self.epoch { now } else { self.epoch + 1 };
        self.epoch
    }
}

pub struct AppState {
    store: RwLock<Store>,
    required_auth: Option<String>,
}

pub type SharedState = Arc<AppState>;

/// Router with no authentication requirement.
pub fn app() -> Router {
    app_with_auth(None)
}

/// Router that rejects requests whose `Authorization` header does not match
/// `required_auth` (when set) with a structured 401.
pub fn app_with_auth(required_auth: Option<String>) -> Router {
    let state: SharedState = Arc::new(AppState {
        store: RwLock::new(Store::default()),
        required_auth,
    });
    Router::new()
        .route("/", get(server_info))
        .route("/buckets", get(list_buckets).post(create_bucket))
        .route(
            "/buckets/{b}",
            get(get_bucket)
                .patch(touch_bucket)
                .put(touch_bucket)
                .delete(delete_bucket),
        )
        .route(
            "/buckets/{b}/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/buckets/{b}/collections/{c}",
            get(get_collection)
                .patch(touch_collection)
                .put(touch_collection)
                .delete(delete_collection),
        )
        .route(
            "/buckets/{b}/collections/{c}/records",
            get(list_records).post(create_record),
        )
        .route(
            "/buckets/{b}/collections/{c}/records/{id}",
            get(get_record)
                .patch(patch_record)
                .put(replace_record)
                .delete(delete_record),
        )
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve with an `Authorization` requirement, for exercising auth handling
/// without pulling axum types into the caller.
pub async fn run_with_auth(
    listener: TcpListener,
    required_auth: Option<String>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_auth(required_auth)).await
}

/// Structured error body, as the real server emits it.
fn api_error(status: StatusCode, errno: i64, message: &str) -> Response {
    let body = json!({
        "errno": errno,
        "message": message,
        "code": status.as_u16(),
        "error": status.canonical_reason().unwrap_or("Unknown"),
    });
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, 110, "Not found")
}

fn enveloped<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "data": data }))
}

async fn check_auth(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.required_auth {
        let supplied = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        if supplied != Some(expected.as_str()) {
            tracing::debug!(path = %request.uri().path(), "rejecting unauthenticated request");
            return api_error(
                StatusCode::UNAUTHORIZED,
                104,
                "Please authenticate yourself",
            );
        }
    }
    next.run(request).await
}

async fn server_info() -> Json<Value> {
    enveloped(json!({
        "project_name": "basin mock server",
        "project_version": env!("CARGO_PKG_VERSION"),
        "http_api_version": "1.22",
    }))
}

// --- buckets ---

async fn list_buckets(State(state): State<SharedState>) -> Json<Value> {
    let store = state.store.read().await;
    let mut metas: Vec<ResourceMeta> = store
        .buckets
        .iter()
        .map(|(id, b)| ResourceMeta {
            id: id.clone(),
            last_modified: b.meta_last_modified,
        })
        .collect();
    metas.sort_by(|a, b| a.id.cmp(&b.id));
    enveloped(metas)
}

async fn create_bucket(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.write().await;
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let stamp = store.tick();
    let bucket = store.buckets.entry(id.clone()).or_insert_with(|| {
        tracing::debug!(bucket = %id, "creating bucket");
        Bucket {
            meta_last_modified: stamp,
            ..Bucket::default()
        }
    });
    let meta = ResourceMeta {
        id,
        last_modified: bucket.meta_last_modified,
    };
    (StatusCode::CREATED, enveloped(meta)).into_response()
}

async fn get_bucket(State(state): State<SharedState>, Path(b): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.buckets.get(&b) {
        Some(bucket) => enveloped(ResourceMeta {
            id: b,
            last_modified: bucket.meta_last_modified,
        })
        .into_response(),
        None => not_found(),
    }
}

async fn touch_bucket(State(state): State<SharedState>, Path(b): Path<String>) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store.buckets.get_mut(&b) {
        Some(bucket) => {
            bucket.meta_last_modified = stamp;
            enveloped(ResourceMeta {
                id: b,
                last_modified: stamp,
            })
            .into_response()
        }
        None => not_found(),
    }
}

async fn delete_bucket(State(state): State<SharedState>, Path(b): Path<String>) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store.buckets.remove(&b) {
        Some(_) => enveloped(json!({ "id": b, "deleted": true, "last_modified": stamp }))
            .into_response(),
        None => not_found(),
    }
}

// --- collections ---

async fn list_collections(
    State(state): State<SharedState>,
    Path(b): Path<String>,
) -> Response {
    let store = state.store.read().await;
    match store.buckets.get(&b) {
        Some(bucket) => {
            let mut metas: Vec<ResourceMeta> = bucket
                .collections
                .iter()
                .map(|(id, c)| ResourceMeta {
                    id: id.clone(),
                    last_modified: c.meta_last_modified,
                })
                .collect();
            metas.sort_by(|a, b| a.id.cmp(&b.id));
            enveloped(metas).into_response()
        }
        None => not_found(),
    }
}

async fn create_collection(
    State(state): State<SharedState>,
    Path(b): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    let Some(bucket) = store.buckets.get_mut(&b) else {
        return not_found();
    };
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let collection = bucket.collections.entry(id.clone()).or_insert_with(|| {
        tracing::debug!(bucket = %b, collection = %id, "creating collection");
        Collection {
            meta_last_modified: stamp,
            ..Collection::default()
        }
    });
    let meta = ResourceMeta {
        id,
        last_modified: collection.meta_last_modified,
    };
    (StatusCode::CREATED, enveloped(meta)).into_response()
}

async fn get_collection(
    State(state): State<SharedState>,
    Path((b, c)): Path<(String, String)>,
) -> Response {
    let store = state.store.read().await;
    match store.buckets.get(&b).and_then(|bucket| bucket.collections.get(&c)) {
        Some(collection) => enveloped(ResourceMeta {
            id: c,
            last_modified: collection.meta_last_modified,
        })
        .into_response(),
        None => not_found(),
    }
}

async fn touch_collection(
    State(state): State<SharedState>,
    Path((b, c)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store
        .buckets
        .get_mut(&b)
        .and_then(|bucket| bucket.collections.get_mut(&c))
    {
        Some(collection) => {
            collection.meta_last_modified = stamp;
            enveloped(ResourceMeta {
                id: c,
                last_modified: stamp,
            })
            .into_response()
        }
        None => not_found(),
    }
}

async fn delete_collection(
    State(state): State<SharedState>,
    Path((b, c)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store.buckets.get_mut(&b).map(|bucket| bucket.collections.remove(&c)) {
        Some(Some(_)) => enveloped(json!({ "id": c, "deleted": true, "last_modified": stamp }))
            .into_response(),
        _ => not_found(),
    }
}

// --- records ---

async fn list_records(
    State(state): State<SharedState>,
    Path((b, c)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = state.store.read().await;
    match store.buckets.get(&b).and_then(|bucket| bucket.collections.get(&c)) {
        Some(collection) => {
            let mut records: Vec<Record> = collection.records.values().cloned().collect();
            match params.get("_sort") {
                Some(spec) => sort_records(&mut records, spec),
                None => records.sort_by(|a, b| a.id.cmp(&b.id)),
            }
            enveloped(records).into_response()
        }
        None => not_found(),
    }
}

async fn create_record(
    State(state): State<SharedState>,
    Path((b, c)): Path<(String, String)>,
    Json(body): Json<RecordBody>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    let Some(collection) = store
        .buckets
        .get_mut(&b)
        .and_then(|bucket| bucket.collections.get_mut(&c))
    else {
        return not_found();
    };
    let record = Record {
        id: Uuid::new_v4().to_string(),
        title: body.title,
        description: body.description,
        last_modified: stamp,
    };
    tracing::debug!(bucket = %b, collection = %c, record = %record.id, "creating record");
    collection.records.insert(record.id.clone(), record.clone());
    (StatusCode::CREATED, enveloped(record)).into_response()
}

async fn get_record(
    State(state): State<SharedState>,
    Path((b, c, id)): Path<(String, String, String)>,
) -> Response {
    let store = state.store.read().await;
    match store
        .buckets
        .get(&b)
        .and_then(|bucket| bucket.collections.get(&c))
        .and_then(|collection| collection.records.get(&id))
    {
        Some(record) => enveloped(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn patch_record(
    State(state): State<SharedState>,
    Path((b, c, id)): Path<(String, String, String)>,
    Json(body): Json<RecordBody>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store
        .buckets
        .get_mut(&b)
        .and_then(|bucket| bucket.collections.get_mut(&c))
        .and_then(|collection| collection.records.get_mut(&id))
    {
        Some(record) => {
            if let Some(title) = body.title {
                record.title = Some(title);
            }
            if let Some(description) = body.description {
                record.description = Some(description);
            }
            record.last_modified = stamp;
            enveloped(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn replace_record(
    State(state): State<SharedState>,
    Path((b, c, id)): Path<(String, String, String)>,
    Json(body): Json<RecordBody>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store
        .buckets
        .get_mut(&b)
        .and_then(|bucket| bucket.collections.get_mut(&c))
        .and_then(|collection| collection.records.get_mut(&id))
    {
        Some(record) => {
            record.title = body.title;
            record.description = body.description;
            record.last_modified = stamp;
            enveloped(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_record(
    State(state): State<SharedState>,
    Path((b, c, id)): Path<(String, String, String)>,
) -> Response {
    let mut store = state.store.write().await;
    let stamp = store.tick();
    match store
        .buckets
        .get_mut(&b)
        .and_then(|bucket| bucket.collections.get_mut(&c))
        .map(|collection| collection.records.remove(&id))
    {
        Some(Some(_)) => {
            tracing::debug!(bucket = %b, collection = %c, record = %id, "deleting record");
            enveloped(json!({ "id": id, "deleted": true, "last_modified": stamp }))
                .into_response()
        }
        _ => not_found(),
    }
}

/// Sort by a comma-separated field list; a leading `-` flips that field to
/// descending. Missing values sort first. Unknown fields are ignored.
fn sort_records(records: &mut [Record], spec: &str) {
    let fields: Vec<&str> = spec.split(',').filter(|f| !f.is_empty()).collect();
    records.sort_by(|a, b| {
        for field in &fields {
            let (name, descending) = match field.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (*field, false),
            };
            let ordering = match name {
                "id" => a.id.cmp(&b.id),
                "title" => a.title.cmp(&b.title),
                "description" => a.description.cmp(&b.description),
                "last_modified" => a.last_modified.cmp(&b.last_modified),
                _ => Ordering::Equal,
            };
            let ordering = if descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
