//! Document Submitter
//!
//! Multipart submission of signed documents, with a single token-refresh
//! retry when the API reports the token expired. Any caller reaching this
//! layer has already been admitted through the request gate.

use crate::auth::TokenManager;
use crate::error::SubmitError;
use crate::transport::{HttpResponse, Transport};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Document creation endpoint, scoped to the shoes product group
pub const CREATE_DOCUMENT_PATH: &str = "/lk/documents/create?pg=shoes";

/// Document type sent with every submission
const DOCUMENT_TYPE: &str = "LP_INTRODUCE_GOODS";

/// Document format sent with every submission
const DOCUMENT_FORMAT: &str = "MANUAL";

/// Submits documents through the shared transport
pub struct DocumentSubmitter<T: Transport> {
    /// Shared HTTP transport
    transport: Arc<T>,

    /// Token manager consulted before each submission
    tokens: Arc<TokenManager<T>>,

    /// API base URL, without a trailing slash
    base_url: String,
}

impl<T: Transport> DocumentSubmitter<T> {
    /// Create a submitter
    pub fn new(
        transport: Arc<T>,
        tokens: Arc<TokenManager<T>>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.into(),
        }
    }

    /// Submit a signed document
    ///
    /// The document is serialized once and posted as multipart form data.
    /// A 401 triggers a token refresh and exactly one retry; any failure
    /// after that is final.
    pub async fn submit<D: Serialize>(
        &self,
        document: &D,
        signature: &str,
    ) -> Result<(), SubmitError> {
        let submission_id = Uuid::new_v4();
        let token = self.tokens.ensure_token().await?;
        let payload = serde_json::to_string(document)?;

        tracing::debug!(
            "Submitting document {} ({} bytes)",
            submission_id,
            payload.len()
        );

        let response = self.post_document(&payload, signature, &token).await?;
        if response.is_success() {
            tracing::debug!(
                "Document {} accepted with status {}",
                submission_id,
                response.status
            );
            return Ok(());
        }

        if response.status != 401 {
            return Err(SubmitError::Rejected {
                status: response.status,
                body: response.body_excerpt(),
            });
        }

        tracing::warn!(
            "Document {} rejected as unauthorized, refreshing token and retrying",
            submission_id
        );

        let token = self.tokens.refresh().await?;
        let retry = self.post_document(&payload, signature, &token).await?;
        if retry.is_success() {
            tracing::debug!(
                "Document {} accepted on retry with status {}",
                submission_id,
                retry.status
            );
            return Ok(());
        }

        Err(SubmitError::RetryRejected {
            status: retry.status,
            body: retry.body_excerpt(),
        })
    }

    /// POST the multipart body with the given bearer token
    async fn post_document(
        &self,
        payload: &str,
        signature: &str,
        token: &str,
    ) -> Result<HttpResponse, SubmitError> {
        let url = format!("{}{}", self.base_url, CREATE_DOCUMENT_PATH);
        let parts = [
            ("product_document", payload),
            ("signature", signature),
            ("type", DOCUMENT_TYPE),
            ("document_format", DOCUMENT_FORMAT),
        ];

        let response = self
            .transport
            .post_multipart(&url, &parts, Some(token))
            .await?;
        Ok(response)
    }
}
