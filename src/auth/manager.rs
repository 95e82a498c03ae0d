//! Token Manager
//!
//! Lazily acquires and caches the API auth token. The token comes out of a
//! two-step exchange: fetch a challenge, sign its data blob, trade the
//! signed blob for a token. The cache holds at most one token and is
//! replaced wholesale; no lock is held across network calls, so two tasks
//! racing a cold cache may each run the exchange and the later write wins.

use crate::auth::signer::Signer;
use crate::error::AuthError;
use crate::transport::Transport;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Challenge endpoint, step one of the exchange
pub const AUTH_CHALLENGE_PATH: &str = "/auth/cert/key";

/// Token endpoint, step two of the exchange
pub const AUTH_TOKEN_PATH: &str = "/auth/cert/";

/// Challenge issued by the API: opaque data to sign plus the uuid that
/// pairs the signature with the challenge
#[derive(Debug, Clone, Deserialize)]
pub struct AuthChallenge {
    /// Challenge id echoed back in the exchange
    pub uuid: String,

    /// Data blob to sign
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Caches the auth token and runs the exchange when it is missing
pub struct TokenManager<T: Transport> {
    /// Shared HTTP transport
    transport: Arc<T>,

    /// Signs challenge data
    signer: Arc<dyn Signer>,

    /// API base URL, without a trailing slash
    base_url: String,

    /// Cached token; `None` until the first successful exchange
    token: RwLock<Option<String>>,
}

impl<T: Transport> TokenManager<T> {
    /// Create a manager with an empty cache
    pub fn new(transport: Arc<T>, signer: Arc<dyn Signer>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            signer,
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }

    /// Return the cached token, running the exchange first if none is held
    pub async fn ensure_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.token.read().await.clone() {
            tracing::trace!("Using cached auth token");
            return Ok(token);
        }

        self.fetch_token().await
    }

    /// Discard the cached token and run the exchange unconditionally
    pub async fn refresh(&self) -> Result<String, AuthError> {
        self.token.write().await.take();
        tracing::debug!("Cached auth token discarded");

        self.fetch_token().await
    }

    /// Run the two-step exchange and cache the result
    async fn fetch_token(&self) -> Result<String, AuthError> {
        let challenge = self.request_challenge().await?;
        let signature = self.signer.sign(&challenge.data)?;
        let token = self.exchange(&challenge.uuid, &signature).await?;

        *self.token.write().await = Some(token.clone());
        tracing::debug!("Auth token acquired");

        Ok(token)
    }

    /// Step one: GET the challenge
    async fn request_challenge(&self) -> Result<AuthChallenge, AuthError> {
        let url = format!("{}{}", self.base_url, AUTH_CHALLENGE_PATH);
        let response = self.transport.get(&url, None).await?;

        if !response.is_success() {
            return Err(AuthError::ChallengeRejected {
                status: response.status,
                body: response.body_excerpt(),
            });
        }

        let challenge: AuthChallenge = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::MalformedChallenge(e.to_string()))?;

        tracing::debug!("Received auth challenge {}", challenge.uuid);
        Ok(challenge)
    }

    /// Step two: POST the signed data for a token
    async fn exchange(&self, uuid: &str, signed_data: &str) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url, AUTH_TOKEN_PATH);
        let fields = [("uuid", uuid), ("data", signed_data)];
        let response = self.transport.post_form(&url, &fields, None).await?;

        if !response.is_success() {
            return Err(AuthError::ExchangeRejected {
                status: response.status,
                body: response.body_excerpt(),
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        Ok(parsed.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::Base64Signer;
    use crate::transport::{HttpResponse, TransportError};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport double that counts calls and replays canned responses
    struct MockTransport {
        get_calls: AtomicUsize,
        form_calls: AtomicUsize,
        get_responses: Mutex<VecDeque<HttpResponse>>,
        form_responses: Mutex<VecDeque<HttpResponse>>,
        last_form_fields: Mutex<Option<Vec<(String, String)>>>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                get_calls: AtomicUsize::new(0),
                form_calls: AtomicUsize::new(0),
                get_responses: Mutex::new(VecDeque::new()),
                form_responses: Mutex::new(VecDeque::new()),
                last_form_fields: Mutex::new(None),
            }
        }

        fn push_get(&self, status: u16, body: &str) {
            self.get_responses.lock().unwrap().push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
        }

        fn push_form(&self, status: u16, body: &str) {
            self.form_responses.lock().unwrap().push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
        }

        fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        fn form_calls(&self) -> usize {
            self.form_calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for MockTransport {
        async fn get(
            &self,
            _url: &str,
            _bearer: Option<&str>,
        ) -> Result<HttpResponse, TransportError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .get_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected challenge request"))
        }

        async fn post_form(
            &self,
            _url: &str,
            fields: &[(&str, &str)],
            _bearer: Option<&str>,
        ) -> Result<HttpResponse, TransportError> {
            self.form_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_form_fields.lock().unwrap() = Some(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
            Ok(self
                .form_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected token exchange"))
        }

        async fn post_multipart(
            &self,
            _url: &str,
            _parts: &[(&str, &str)],
            _bearer: Option<&str>,
        ) -> Result<HttpResponse, TransportError> {
            unreachable!("token manager never posts documents")
        }
    }

    fn manager(transport: Arc<MockTransport>) -> TokenManager<MockTransport> {
        TokenManager::new(transport, Arc::new(Base64Signer), "https://crpt.test/api/v3")
    }

    #[tokio::test]
    async fn test_first_call_runs_the_exchange_once() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(200, r#"{"token":"tok-1"}"#);
        let manager = manager(transport.clone());

        let token = manager.ensure_token().await.unwrap();
        assert_eq!(token, "tok-1");
        assert_eq!(transport.get_calls(), 1);
        assert_eq!(transport.form_calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_token_skips_the_network() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(200, r#"{"token":"tok-1"}"#);
        let manager = manager(transport.clone());

        manager.ensure_token().await.unwrap();
        let token = manager.ensure_token().await.unwrap();

        assert_eq!(token, "tok-1");
        assert_eq!(transport.get_calls(), 1);
        assert_eq!(transport.form_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_discards_and_reacquires() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(200, r#"{"token":"tok-1"}"#);
        transport.push_get(200, r#"{"uuid":"u-2","data":"blob2"}"#);
        transport.push_form(200, r#"{"token":"tok-2"}"#);
        let manager = manager(transport.clone());

        assert_eq!(manager.ensure_token().await.unwrap(), "tok-1");
        assert_eq!(manager.refresh().await.unwrap(), "tok-2");
        assert_eq!(transport.get_calls(), 2);
        assert_eq!(transport.form_calls(), 2);

        // The refreshed token is now the cached one.
        assert_eq!(manager.ensure_token().await.unwrap(), "tok-2");
        assert_eq!(transport.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_exchange_sends_uuid_and_signed_data() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-9","data":"challenge-data"}"#);
        transport.push_form(200, r#"{"token":"tok-9"}"#);
        let manager = manager(transport.clone());

        manager.ensure_token().await.unwrap();

        let fields = transport.last_form_fields.lock().unwrap().clone().unwrap();
        assert_eq!(fields[0], ("uuid".to_string(), "u-9".to_string()));
        // Base64 of "challenge-data", as the stub signer produces.
        assert_eq!(
            fields[1],
            ("data".to_string(), "Y2hhbGxlbmdlLWRhdGE=".to_string())
        );
    }

    #[tokio::test]
    async fn test_challenge_rejection_carries_status() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(503, "maintenance");
        let manager = manager(transport.clone());

        let err = manager.ensure_token().await.unwrap_err();
        match err {
            AuthError::ChallengeRejected { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected challenge rejection, got {:?}", other),
        }
        assert_eq!(transport.form_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_challenge_is_not_a_transport_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"unexpected":"shape"}"#);
        let manager = manager(transport.clone());

        let err = manager.ensure_token().await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedChallenge(_)));
        assert_eq!(transport.form_calls(), 0);
    }

    #[tokio::test]
    async fn test_exchange_rejection_carries_status() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(403, "certificate revoked");
        let manager = manager(transport.clone());

        let err = manager.ensure_token().await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::ExchangeRejected { status: 403, .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_token_response() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(200, "not json");
        let manager = manager(transport.clone());

        let err = manager.ensure_token().await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[tokio::test]
    async fn test_failed_exchange_leaves_cache_empty() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get(500, "boom");
        transport.push_get(200, r#"{"uuid":"u-1","data":"blob"}"#);
        transport.push_form(200, r#"{"token":"tok-1"}"#);
        let manager = manager(transport.clone());

        assert!(manager.ensure_token().await.is_err());

        // The next call starts over instead of serving a stale token.
        assert_eq!(manager.ensure_token().await.unwrap(), "tok-1");
        assert_eq!(transport.get_calls(), 2);
    }
}
