//! Synchronous client core for a bucket/collection/record document store.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `Client` is stateless — it holds only its configuration (base URL,
//!   default headers, credentials).
//! - `Endpoint` is a closed enum over the store's three-level resource
//!   scheme; every operation is a direct verb + endpoint combination.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Success payloads are unwrapped from the `{"data": ...}` envelope; bad
//!   statuses decode into a structured API error when the body matches the
//!   server's error schema and a raw server error otherwise.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod types;

pub use auth::Auth;
pub use client::Client;
pub use endpoint::Endpoint;
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Deleted, ErrorDetail, Record, RecordPayload, ServerInfo};
