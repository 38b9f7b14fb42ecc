//! Structured errors for cryptographic operations.

use thiserror::Error;

/// Errors from key loading and signing.
///
/// Deliberately small: signature *verification* has no error variant at all
/// because it resolves every failure to `false` (see
/// [`SignatureVerifier::verify`](crate::SignatureVerifier::verify)).
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A PEM key could not be parsed.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The RSA signing operation itself failed.
    #[error("signing failed: {0}")]
    Signing(String),
}
