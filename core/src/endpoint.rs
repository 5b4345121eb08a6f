//! Logical addresses for the remote store's resources.
//!
//! # Design
//! The store arranges resources three levels deep (bucket ⊃ collection ⊃
//! record). `Endpoint` is a closed enum over every addressable resource, each
//! variant carrying exactly the identifiers its path needs, so URL
//! construction is a single deterministic function rather than string
//! plumbing scattered across call sites.

/// A logical address of one resource (or resource listing) in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// The server root. Serves instance information.
    Root,
    /// The listing of all buckets.
    Buckets,
    /// A single bucket.
    Bucket(String),
    /// The listing of collections inside a bucket.
    Collections(String),
    /// A single collection.
    Collection(String, String),
    /// The listing of records inside a collection.
    Records(String, String),
    /// A single record.
    Record(String, String, String),
}

impl Endpoint {
    /// Join this endpoint onto `base` (already normalized, no trailing
    /// slash).
    ///
    /// `Root` always ends in `/` — the upstream server answers a bare base
    /// URL with a redirect to the slash form, and following it would cost a
    /// round-trip.
    pub fn url(&self, base: &str) -> String {
        match self {
            Endpoint::Root => format!("{base}/"),
            Endpoint::Buckets => format!("{base}/buckets"),
            Endpoint::Bucket(b) => format!("{base}/buckets/{b}"),
            Endpoint::Collections(b) => format!("{base}/buckets/{b}/collections"),
            Endpoint::Collection(b, c) => format!("{base}/buckets/{b}/collections/{c}"),
            Endpoint::Records(b, c) => {
                format!("{base}/buckets/{b}/collections/{c}/records")
            }
            Endpoint::Record(b, c, id) => {
                format!("{base}/buckets/{b}/collections/{c}/records/{id}")
            }
        }
    }

    /// Whether this endpoint addresses a listing rather than a single
    /// resource. Create and list operations are only valid here.
    pub fn is_plural(&self) -> bool {
        matches!(
            self,
            Endpoint::Buckets | Endpoint::Collections(_) | Endpoint::Records(_, _)
        )
    }
}
