//! Domain-level error types shared across the workspace.

use thiserror::Error;

/// Errors from validating domain values.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A digest string failed validation.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// A content identifier failed validation.
    #[error("invalid content identifier: {0}")]
    InvalidCid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_digest_display() {
        let err = DomainError::InvalidDigest("too short".to_string());
        assert!(format!("{err}").contains("too short"));
    }

    #[test]
    fn invalid_cid_display() {
        let err = DomainError::InvalidCid("empty".to_string());
        assert!(format!("{err}").contains("empty"));
    }
}
