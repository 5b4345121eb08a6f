//! Stateless HTTP request builder and response parser for the document store.
//!
//! # Design
//! `Client` holds only its configuration (base URL, default headers,
//! credentials) and carries no mutable state between calls. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and free of I/O
//! dependencies.
//!
//! Every verb is a direct combination of method and [`Endpoint`]; there is no
//! business logic beyond path selection and header assembly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::Auth;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Deleted, Envelope, ErrorDetail, ServerInfo};

/// Synchronous, stateless client for the document-store API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    headers: Vec<(String, String)>,
    auth: Auth,
}

impl Client {
    /// Configure a client for `base_url` with the given credentials.
    ///
    /// A single trailing `/` on `base_url` is stripped so endpoint joining
    /// yields the same URL either way.
    pub fn new(base_url: &str, auth: Auth) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            base_url: base_url.to_string(),
            headers: Vec::new(),
            auth,
        }
    }

    /// Attach default headers sent with every request.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assemble a request: default headers, then the auth header, then
    /// `content-type` when a body is present.
    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = self.headers.clone();
        if let Some(auth) = self.auth.header() {
            headers.push(auth);
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn json_body<T: Serialize>(payload: &T) -> Result<String, Error> {
        serde_json::to_string(payload).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// GET a single resource (or the root).
    pub fn build_get(&self, endpoint: &Endpoint) -> HttpRequest {
        self.request(HttpMethod::Get, endpoint.url(&self.base_url), None)
    }

    /// GET a listing endpoint. A non-empty `sort` appends `?_sort=f1,f2`;
    /// a leading `-` on a field requests descending order.
    pub fn build_list(&self, endpoint: &Endpoint, sort: &[&str]) -> HttpRequest {
        debug_assert!(endpoint.is_plural());
        let mut url = endpoint.url(&self.base_url);
        if !sort.is_empty() {
            url.push_str("?_sort=");
            url.push_str(&sort.join(","));
        }
        self.request(HttpMethod::Get, url, None)
    }

    /// POST a new resource to a listing endpoint.
    pub fn build_create<T: Serialize>(
        &self,
        endpoint: &Endpoint,
        payload: &T,
    ) -> Result<HttpRequest, Error> {
        debug_assert!(endpoint.is_plural());
        let body = Self::json_body(payload)?;
        Ok(self.request(HttpMethod::Post, endpoint.url(&self.base_url), Some(body)))
    }

    /// PATCH a resource (partial update).
    pub fn build_update<T: Serialize>(
        &self,
        endpoint: &Endpoint,
        payload: &T,
    ) -> Result<HttpRequest, Error> {
        let body = Self::json_body(payload)?;
        Ok(self.request(HttpMethod::Patch, endpoint.url(&self.base_url), Some(body)))
    }

    /// PUT a resource (full replacement).
    pub fn build_replace<T: Serialize>(
        &self,
        endpoint: &Endpoint,
        payload: &T,
    ) -> Result<HttpRequest, Error> {
        let body = Self::json_body(payload)?;
        Ok(self.request(HttpMethod::Put, endpoint.url(&self.base_url), Some(body)))
    }

    /// DELETE a resource.
    pub fn build_delete(&self, endpoint: &Endpoint) -> HttpRequest {
        self.request(HttpMethod::Delete, endpoint.url(&self.base_url), None)
    }

    /// Decode a response into the envelope's `data` field.
    ///
    /// A 2xx body that fails to decode is a `Network` error (malformed
    /// payload); a bad status maps to `Api` when the body matches the
    /// structured error schema and to `Server` otherwise.
    pub fn parse_data<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, Error> {
        if (200..300).contains(&response.status) {
            let envelope: Envelope<T> = serde_json::from_str(&response.body)
                .map_err(|e| Error::Network(format!("malformed response body: {e}")))?;
            return Ok(envelope.data);
        }
        Err(error_from_response(response))
    }

    /// Decode a delete confirmation.
    pub fn parse_deleted(&self, response: HttpResponse) -> Result<Deleted, Error> {
        self.parse_data(response)
    }

    /// Decode the root endpoint's instance information.
    pub fn parse_server_info(&self, response: HttpResponse) -> Result<ServerInfo, Error> {
        self.parse_data(response)
    }
}

/// Map a bad-status response to `Api` when its body parses as the structured
/// error schema, `Server` otherwise.
fn error_from_response(response: HttpResponse) -> Error {
    match serde_json::from_str::<ErrorDetail>(&response.body) {
        Ok(detail) => Error::Api {
            status: response.status,
            detail,
        },
        Err(_) => Error::Server {
            status: response.status,
            body: response.body,
        },
    }
}
