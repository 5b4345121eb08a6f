//! Credential handling for outgoing requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// How the client authenticates against the store.
///
/// Fixed per `Client` instance. `Basic` credentials are Base64-encoded into
/// the `Authorization` header; encoding an in-memory string cannot fail, so
/// header construction is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Send no `Authorization` header.
    None,
    /// `Authorization: Basic base64(username:password)`.
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`.
    Bearer { token: String },
}

impl Auth {
    /// The `Authorization` header for this credential, if any.
    pub fn header(&self) -> Option<(String, String)> {
        match self {
            Auth::None => None,
            Auth::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(("authorization".to_string(), format!("Basic {encoded}")))
            }
            Auth::Bearer { token } => {
                Some(("authorization".to_string(), format!("Bearer {token}")))
            }
        }
    }
}
