//! # evid-core — Domain Types for the Evidence Integrity Stack
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace:
//!
//! - **Content digests** — SHA-256 over the exact uploaded bytes, rendered
//!   as 64-char lowercase hex. The digest is the value that binds a stored
//!   evidence record to its content.
//! - **Content identifiers** ([`Cid`]) — the address assigned by the
//!   content-addressable blob store, used both as storage key and as a
//!   stable external reference.
//! - **Evidence records** ([`EvidenceRecord`]) — the persisted tuple of
//!   case reference, CID, digest, signature, and content type.
//! - **Verification verdicts** ([`VerificationVerdict`]) — the computed,
//!   never-persisted outcome of an integrity check.
//!
//! ## Crate Policy
//!
//! No I/O here. Everything in this crate is a pure type or a pure function,
//! so the upper layers (store adapter, pipelines, HTTP surface) can be
//! exercised against it without any backend.

pub mod digest;
pub mod error;
pub mod record;
pub mod verdict;

pub use digest::{sha256_hex, validate_digest_hex, DIGEST_HEX_LEN};
pub use error::DomainError;
pub use record::{Cid, EvidenceRecord, NewEvidence};
pub use verdict::{VerdictReason, VerificationVerdict};
