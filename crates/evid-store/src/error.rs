//! Store adapter error types.

use thiserror::Error;

/// Errors from the content-addressable store.
///
/// The split matters to the verification pipeline: `NotFound` and
/// `Unavailable` both surface as a `STORE_UNREACHABLE` verdict, but
/// `Unavailable` during ingestion aborts the whole pipeline before any
/// record is persisted.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend unreachable, timed out, or misconfigured (missing bucket,
    /// bad credentials). Operator-correctable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but has no content for the requested CID.
    #[error("content not found: {0}")]
    NotFound(String),
}
