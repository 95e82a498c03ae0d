//! Client Facade
//!
//! Ties the admission gate, window timer, token manager, and document
//! submitter into one handle. A single `CrptClient` is meant to be shared
//! by every task submitting documents; the rate window is enforced across
//! all of them.

use crate::auth::{Base64Signer, Signer, TokenManager};
use crate::config::ClientConfig;
use crate::documents::DocumentSubmitter;
use crate::error::Error;
use crate::gate::{RequestGate, WindowTimer};
use crate::transport::{ReqwestTransport, Transport};
use serde::Serialize;
use std::sync::Arc;

/// Rate-limited client for the goods registration API
pub struct CrptClient<T: Transport> {
    /// Validated configuration
    config: ClientConfig,

    /// Admission gate shared with the window timer
    gate: Arc<RequestGate>,

    /// Background task resetting the gate once per period
    timer: WindowTimer,

    /// Document submission pipeline
    submitter: DocumentSubmitter<T>,
}

impl<T: Transport> std::fmt::Debug for CrptClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrptClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CrptClient<ReqwestTransport> {
    /// Create a client backed by the real HTTP transport
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = Arc::new(ReqwestTransport::new(&config));
        Self::with_transport(config, transport, Arc::new(Base64Signer))
    }
}

impl<T: Transport> CrptClient<T> {
    /// Create a client over an arbitrary transport and signer
    ///
    /// Validates the configuration and starts the window timer; the first
    /// window opens immediately.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<T>,
        signer: Arc<dyn Signer>,
    ) -> Result<Self, Error> {
        config.validate()?;

        let gate = Arc::new(RequestGate::new(config.window));
        let timer = WindowTimer::start(gate.clone());
        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            signer,
            config.base_url.clone(),
        ));
        let submitter = DocumentSubmitter::new(transport, tokens, config.base_url.clone());

        tracing::info!(
            "CRPT client ready: {} requests per {}ms window against {}",
            config.window.limit(),
            config.window.period().as_millis(),
            config.base_url
        );

        Ok(Self {
            config,
            gate,
            timer,
            submitter,
        })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a signed document, blocking until the rate window admits it
    ///
    /// Admission can fail if the wait budget (twice the window period) runs
    /// out or the client is shut down while waiting. After admission the
    /// document is posted; a stale token is refreshed and retried once.
    pub async fn submit_document<D: Serialize>(
        &self,
        document: &D,
        signature: &str,
    ) -> Result<(), Error> {
        let admission = self.gate.admit().await?;
        tracing::trace!(
            "Submission admitted after {}ms wait",
            admission.waited.as_millis()
        );

        self.submitter.submit(document, signature).await?;
        Ok(())
    }

    /// Shut the client down
    ///
    /// Closes the admission gate, waking parked callers into a rejection,
    /// then stops the window timer within the configured grace period.
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        self.gate.close();
        self.timer.stop(self.config.shutdown_grace).await;
        tracing::info!("CRPT client stopped");
    }
}
