//! # evid-crypto — Signature Engine
//!
//! RSA signing and verification for evidence digests. The scheme is fixed
//! for the system's lifetime: RSA-2048 with PKCS#1 v1.5 padding over
//! SHA-256, signature transported as base64. Both signer and verifier
//! operate on the ASCII hex digest string — not the raw content bytes — so
//! a signature stored years ago validates against a freshly recomputed
//! digest of the same content.
//!
//! ## Operating Modes
//!
//! Signing is optional: when no private key is configured the engine
//! reports [`SigningOutcome::Unsigned`] rather than erroring, because
//! "no key configured" is an expected deployment mode, not a failure.
//! Verification is total: [`SignatureVerifier::verify`] never panics or
//! returns an error — malformed base64, truncated signatures, and wrong
//! keys all resolve to `false`, since it is queried on untrusted and
//! legacy data.
//!
//! ## Key Handling
//!
//! Keys load once at startup from PEM (PKCS#8 with a PKCS#1 fallback) and
//! are immutable for the process lifetime. Private keys are never
//! serialized or logged.

pub mod error;
pub mod keys;
pub mod sign;

pub use error::CryptoError;
pub use keys::{normalize_pem, RsaSigningKey, RsaVerifyingKey};
pub use sign::{SignatureVerifier, Signer, SigningOutcome};
