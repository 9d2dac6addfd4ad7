use thiserror::Error;

/// Store backend failure.
///
/// A missing record is not an error — lookups return `Ok(None)` for
/// that. `StoreError` means the backend itself misbehaved and the
/// request should fail as a server fault.
#[derive(Debug, Error)]
pub enum StoreError {
    /// CouchDB request failed (connect, status, or timeout).
    #[error("couchdb request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned something we could not use.
    #[error("{0}")]
    Backend(String),
}
