//! # Digest Signing and Verification
//!
//! The two halves of the signature engine. [`Signer`] runs at ingestion
//! time and produces a tagged [`SigningOutcome`] — signed or unsigned —
//! so that "no key configured" flows through the pipeline as data rather
//! than as an error. [`SignatureVerifier`] runs at verification time and
//! resolves strictly to a boolean: it is queried on legacy and untrusted
//! inputs, so no malformed signature may ever surface as an exception.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs1v15::Signature;
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};

use crate::error::CryptoError;
use crate::keys::{RsaSigningKey, RsaVerifyingKey};

/// The result of an attempt to sign a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutcome {
    /// Digest was signed; carries the base64-encoded signature.
    Signed(String),
    /// No private key is configured — the record will be persisted
    /// without a signature.
    Unsigned,
}

impl SigningOutcome {
    /// The signature for persistence, `None` when unsigned.
    pub fn into_signature(self) -> Option<String> {
        match self {
            Self::Signed(sig) => Some(sig),
            Self::Unsigned => None,
        }
    }
}

/// Signs evidence digests with the process-wide private key, when one
/// is configured.
#[derive(Debug, Clone)]
pub struct Signer {
    key: Option<RsaSigningKey>,
}

impl Signer {
    /// A signer backed by a private key.
    pub fn new(key: RsaSigningKey) -> Self {
        Self { key: Some(key) }
    }

    /// A signer with no key — every digest comes back [`SigningOutcome::Unsigned`].
    pub fn unsigned() -> Self {
        Self { key: None }
    }

    /// Whether a private key is configured.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Sign a hex digest string.
    ///
    /// The signature covers the ASCII bytes of the hex string, matching
    /// what the verifier checks. Returns [`SigningOutcome::Unsigned`] when
    /// no key is configured; a real RSA failure is an error.
    pub fn sign(&self, digest_hex: &str) -> Result<SigningOutcome, CryptoError> {
        let Some(key) = &self.key else {
            return Ok(SigningOutcome::Unsigned);
        };
        let signature = key
            .inner()
            .try_sign(digest_hex.as_bytes())
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(SigningOutcome::Signed(BASE64.encode(signature.to_vec())))
    }
}

/// Verifies base64 signatures over hex digests against the system
/// public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: Option<RsaVerifyingKey>,
}

impl SignatureVerifier {
    /// A verifier backed by the system public key.
    pub fn new(key: RsaVerifyingKey) -> Self {
        Self { key: Some(key) }
    }

    /// A verifier with no key — every check resolves to `false`.
    pub fn unconfigured() -> Self {
        Self { key: None }
    }

    /// Whether a public key is configured.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Check a base64 signature against a hex digest.
    ///
    /// Total over its inputs: missing key, undecodable base64, wrong
    /// signature length, and cryptographic rejection all return `false`.
    pub fn verify(&self, digest_hex: &str, signature_b64: &str) -> bool {
        let Some(key) = &self.key else {
            return false;
        };
        let Ok(raw) = BASE64.decode(signature_b64.trim()) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(raw.as_slice()) else {
            return false;
        };
        key.inner().verify(digest_hex.as_bytes(), &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair() -> (Signer, SignatureVerifier) {
        let (signing, verifying) = RsaSigningKey::generate().unwrap();
        (Signer::new(signing), SignatureVerifier::new(verifying))
    }

    const DIGEST: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn sign_verify_roundtrip() {
        let (signer, verifier) = keypair();
        let outcome = signer.sign(DIGEST).unwrap();
        let SigningOutcome::Signed(sig) = outcome else {
            panic!("expected a signature");
        };
        assert!(!sig.is_empty());
        assert!(verifier.verify(DIGEST, &sig));
    }

    #[test]
    fn signing_is_deterministic() {
        // PKCS#1 v1.5 padding is deterministic: same key + digest → same bytes.
        let (signer, _) = keypair();
        let a = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        let b = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn altered_digest_fails_verification() {
        let (signer, verifier) = keypair();
        let sig = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        let altered = DIGEST.replace('b', "c");
        assert!(!verifier.verify(&altered, &sig));
    }

    #[test]
    fn unrelated_public_key_fails_verification() {
        let (signer, _) = keypair();
        let (_, other_verifier) = keypair();
        let sig = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        assert!(!other_verifier.verify(DIGEST, &sig));
    }

    #[test]
    fn malformed_base64_is_false_not_error() {
        let (_, verifier) = keypair();
        assert!(!verifier.verify(DIGEST, "%%% not base64 %%%"));
        assert!(!verifier.verify(DIGEST, ""));
    }

    #[test]
    fn truncated_signature_is_false() {
        let (signer, verifier) = keypair();
        let sig = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        let truncated = &sig[..sig.len() / 2];
        assert!(!verifier.verify(DIGEST, truncated));
    }

    #[test]
    fn unsigned_signer_reports_unsigned() {
        let signer = Signer::unsigned();
        assert!(!signer.is_configured());
        assert_eq!(signer.sign(DIGEST).unwrap(), SigningOutcome::Unsigned);
    }

    #[test]
    fn unconfigured_verifier_is_always_false() {
        let (signer, _) = keypair();
        let sig = signer.sign(DIGEST).unwrap().into_signature().unwrap();
        let verifier = SignatureVerifier::unconfigured();
        assert!(!verifier.verify(DIGEST, &sig));
    }

    #[test]
    fn outcome_into_signature() {
        assert_eq!(SigningOutcome::Unsigned.into_signature(), None);
        assert_eq!(
            SigningOutcome::Signed("abc".into()).into_signature(),
            Some("abc".to_string())
        );
    }
}
