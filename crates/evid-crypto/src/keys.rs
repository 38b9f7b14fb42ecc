//! # RSA Key Material
//!
//! Wrapper types around the RustCrypto `rsa` keys, fixed to the system's
//! PKCS#1 v1.5 / SHA-256 scheme. Loading accepts both PKCS#8 and legacy
//! PKCS#1 PEM encodings, since operator-provisioned keys arrive in either.
//!
//! Keys injected through environment variables often carry literal `\n`
//! escape sequences instead of real newlines; [`normalize_pem`] undoes
//! that before parsing.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::Sha256;
use rsa::{pkcs1v15, RsaPrivateKey, RsaPublicKey};

use crate::error::CryptoError;

/// RSA modulus size for generated keys. Fixed for the system's lifetime.
const RSA_BITS: usize = 2048;

/// The private signing key, bound to PKCS#1 v1.5 / SHA-256.
///
/// Does not implement `Serialize`, `Debug` on the inner key, or any
/// accessor that exposes private material.
#[derive(Clone)]
pub struct RsaSigningKey {
    inner: pkcs1v15::SigningKey<Sha256>,
}

/// The public verification key, bound to PKCS#1 v1.5 / SHA-256.
#[derive(Clone)]
pub struct RsaVerifyingKey {
    inner: pkcs1v15::VerifyingKey<Sha256>,
}

/// Normalize a PEM string sourced from an environment variable.
///
/// Replaces literal `\n` escape sequences with real newlines and trims
/// surrounding whitespace.
pub fn normalize_pem(raw: &str) -> String {
    raw.replace("\\n", "\n").trim().to_string()
}

impl RsaSigningKey {
    /// Parse a private key from PEM (PKCS#8, falling back to PKCS#1).
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let pem = normalize_pem(pem);
        let key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|e| CryptoError::InvalidKey(format!("RSA private key: {e}")))?;
        Ok(Self {
            inner: pkcs1v15::SigningKey::new(key),
        })
    }

    /// Generate a fresh RSA-2048 key pair.
    ///
    /// Used by tests and ephemeral development deployments; production keys
    /// are provisioned as PEM and loaded with [`from_pem`](Self::from_pem).
    pub fn generate() -> Result<(Self, RsaVerifyingKey), CryptoError> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, RSA_BITS)
            .map_err(|e| CryptoError::Signing(format!("key generation: {e}")))?;
        let public = RsaPublicKey::from(&private);
        Ok((
            Self {
                inner: pkcs1v15::SigningKey::new(private),
            },
            RsaVerifyingKey {
                inner: pkcs1v15::VerifyingKey::new(public),
            },
        ))
    }

    pub(crate) fn inner(&self) -> &pkcs1v15::SigningKey<Sha256> {
        &self.inner
    }
}

impl std::fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("RsaSigningKey(..)")
    }
}

impl RsaVerifyingKey {
    /// Parse a public key from PEM (SPKI/PKCS#8, falling back to PKCS#1).
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let pem = normalize_pem(pem);
        let key = RsaPublicKey::from_public_key_pem(&pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(&pem))
            .map_err(|e| CryptoError::InvalidKey(format!("RSA public key: {e}")))?;
        Ok(Self {
            inner: pkcs1v15::VerifyingKey::new(key),
        })
    }

    pub(crate) fn inner(&self) -> &pkcs1v15::VerifyingKey<Sha256> {
        &self.inner
    }
}

impl std::fmt::Debug for RsaVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RsaVerifyingKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_pem_replaces_escaped_newlines() {
        let raw = "-----BEGIN PUBLIC KEY-----\\nAAAA\\n-----END PUBLIC KEY-----";
        let normalized = normalize_pem(raw);
        assert!(normalized.contains("-----\nAAAA\n-----"));
        assert!(!normalized.contains("\\n"));
    }

    #[test]
    fn normalize_pem_trims_whitespace() {
        assert_eq!(normalize_pem("  key  \n"), "key");
    }

    #[test]
    fn from_pem_rejects_garbage() {
        assert!(RsaSigningKey::from_pem("not a key").is_err());
        assert!(RsaVerifyingKey::from_pem("not a key").is_err());
    }

    #[test]
    fn generate_produces_usable_pair() {
        let (signing, _verifying) = RsaSigningKey::generate().unwrap();
        // Debug must not leak key material.
        assert_eq!(format!("{signing:?}"), "RsaSigningKey(..)");
    }
}
