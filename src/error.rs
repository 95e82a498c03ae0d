//! Client Error Types
//!
//! This module defines the error taxonomy for the client: configuration,
//! admission, authentication, and submission failures. Transport and signing
//! errors originate in their own modules and convert into these via `From`.

use crate::auth::signer::SignError;
use crate::transport::TransportError;
use std::time::Duration;

/// Errors detected when validating client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Window limit of zero would reject every request
    #[error("Window limit must be greater than zero")]
    ZeroLimit,

    /// Window period of zero has no meaningful reset cadence
    #[error("Window period must be greater than zero")]
    ZeroPeriod,

    /// Base URL is required to reach the API
    #[error("Base URL must not be empty")]
    EmptyBaseUrl,
}

/// Errors produced by the request gate
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    /// No slot opened within the wait budget
    #[error(
        "Admission wait exhausted after {}ms (budget {}ms)",
        .waited.as_millis(),
        .budget.as_millis()
    )]
    Timeout {
        /// Time actually spent waiting
        waited: Duration,
        /// Maximum the caller was willing to wait (twice the window period)
        budget: Duration,
    },

    /// Gate closed by shutdown
    #[error("Client is shutting down, request rejected")]
    Rejected,
}

/// Errors produced by the token manager
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// HTTP failure while talking to the auth endpoints
    #[error("Auth transport error: {0}")]
    Transport(#[from] TransportError),

    /// Challenge endpoint returned a non-success status
    #[error("Auth challenge rejected with status {status}: {body}")]
    ChallengeRejected { status: u16, body: String },

    /// Token endpoint returned a non-success status
    #[error("Token exchange rejected with status {status}: {body}")]
    ExchangeRejected { status: u16, body: String },

    /// Challenge response body did not have the expected shape
    #[error("Malformed auth challenge: {0}")]
    MalformedChallenge(String),

    /// Token response body did not have the expected shape
    #[error("Malformed token response: {0}")]
    MalformedToken(String),

    /// Signing the challenge data failed
    #[error("Signing failed: {0}")]
    Signing(#[from] SignError),
}

/// Errors produced by the document submitter
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Token acquisition or refresh failed
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// HTTP failure while posting the document
    #[error("Submit transport error: {0}")]
    Transport(#[from] TransportError),

    /// Document could not be serialized to JSON
    #[error("Document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// API rejected the document
    #[error("Document rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// API rejected the document again after a token refresh
    #[error("Document rejected after token refresh with status {status}: {body}")]
    RetryRejected { status: u16, body: String },
}

/// Top-level error type returned by the client facade
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Request was not admitted through the rate gate
    #[error("Admission failed: {0}")]
    Admission(#[from] AdmissionError),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Document submission failed
    #[error("Document submission failed: {0}")]
    Submit(SubmitError),
}

impl From<SubmitError> for Error {
    fn from(err: SubmitError) -> Self {
        // Auth failures surface as Error::Auth regardless of which call
        // path discovered them.
        match err {
            SubmitError::Auth(auth) => Error::Auth(auth),
            other => Error::Submit(other),
        }
    }
}
