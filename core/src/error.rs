//! Error types for the document-store client.
//!
//! # Design
//! Response failures fall into three classes, mirrored as variants: a bad
//! status whose body matches the server's structured error schema (`Api`), a
//! bad status whose body does not parse (`Server`, carrying the raw body for
//! debugging), and transport-level trouble including an undecodable success
//! payload (`Network`). `Serialization` covers the request side only. The UI
//! surfaces any of them through their `Display` rendering; nothing is
//! retried.

use thiserror::Error;

use crate::types::ErrorDetail;

/// Errors returned by `Client` build and parse methods.
#[derive(Debug, Error)]
pub enum Error {
    /// The server returned a bad status and a body that does not match the
    /// structured error schema.
    #[error("unexpected server response: HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The server returned a bad status with a structured error body.
    #[error("{} {} ({}): {}", .status, .detail.error, .detail.errno, .detail.message)]
    Api { status: u16, detail: ErrorDetail },

    /// Transport-level failure: timeout, connection failure, or a success
    /// response whose payload could not be decoded.
    #[error("network error: {0}")]
    Network(String),

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(String),
}
