//! Challenge Signing
//!
//! The auth exchange requires the challenge data to be signed with the
//! participant's certificate. Real deployments plug in detached-signature
//! cryptography behind the [`Signer`] trait; the bundled implementation is
//! a stand-in that test environments accept.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Signing failure
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct SignError {
    /// Failure description
    pub reason: String,
}

impl SignError {
    /// Create a signing error
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Produces the signature sent in the token exchange
pub trait Signer: Send + Sync {
    /// Sign `data`, returning the signature encoded for transmission
    fn sign(&self, data: &str) -> Result<String, SignError>;
}

/// Placeholder signer that base64-encodes the challenge data
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Signer;

impl Signer for Base64Signer {
    fn sign(&self, data: &str) -> Result<String, SignError> {
        Ok(STANDARD.encode(data))
    }
}
