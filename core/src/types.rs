//! Domain DTOs for the document-store API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Success
//! payloads always arrive wrapped in an `Envelope`; request bodies are sent
//! bare.

use serde::{Deserialize, Serialize};

/// A single record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub last_modified: i64,
}

/// Request payload for creating, updating, or replacing a record.
///
/// Serializes to exactly `{"title": ..., "description": ...}` — both fields
/// are always present in the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordPayload {
    pub title: String,
    pub description: String,
}

/// Envelope data of a successful delete: the server's confirmation of which
/// resource was removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
    pub last_modified: i64,
}

/// Envelope data of the root endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerInfo {
    pub project_name: String,
    pub project_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_api_version: Option<String>,
}

/// The structured error body the server attaches to failed responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub errno: i64,
    pub message: String,
    pub code: i64,
    pub error: String,
}

/// The `{"data": ...}` wrapper around every successful payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}
