//! Authentication Module
//!
//! Token acquisition for the API: a two-step exchange (challenge, sign,
//! trade for a token) with a process-local cache, plus the pluggable
//! signer seam the exchange depends on.

pub mod manager;
pub mod signer;

pub use manager::{AuthChallenge, TokenManager, AUTH_CHALLENGE_PATH, AUTH_TOKEN_PATH};
pub use signer::{Base64Signer, SignError, Signer};
