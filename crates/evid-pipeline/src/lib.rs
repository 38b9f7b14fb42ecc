//! # evid-pipeline — Ingestion and Verification
//!
//! The two orchestrations at the heart of the Evidence Integrity Stack.
//! Ingestion flows one direction (buffer → digest → signature → store →
//! record); verification replays it in reverse (record → store fetch →
//! recompute → compare → signature check → verdict). Both are generic over
//! the [`EvidenceStore`](evid_store::EvidenceStore) and
//! [`EvidenceRepository`] seams, so the same pipeline code runs against the
//! real pinning backend in production and the in-memory backends in tests.
//!
//! ## Concurrency
//!
//! Pipelines are request-scoped and stateless between invocations. The only
//! shared state is the immutable key material and the `Arc`-shared
//! adapters; concurrent ingestions and verifications need no coordination.
//! Verification never mutates stored data, so cancelling one mid-flight
//! corrupts nothing.

pub mod ingest;
pub mod repository;
pub mod verify;

pub use ingest::{IngestError, IngestRequest, IngestionPipeline};
pub use repository::{EvidenceRepository, MemoryRepository, RepositoryError};
pub use verify::{EvidenceLookup, VerificationPipeline};
