//! Rate-Limited Client for the CRPT Goods Registration API
//!
//! This library provides a thread-safe client for the Chestny Znak goods
//! registration API. A single client instance is shared by any number of
//! tasks; document submissions from all of them are throttled through one
//! fixed admission window.
//!
//! # Architecture
//!
//! - **Request gate**: atomic counter enforcing at most N admissions per
//!   window, with parked callers woken when the window resets
//! - **Window timer**: background task zeroing the counter once per period
//! - **Token manager**: lazy two-step auth exchange with a cached token
//! - **Document submitter**: multipart POST with a single refresh-and-retry
//!   on an expired token
//!
//! ```text
//! submit_document()
//!        |
//!        v
//!   RequestGate  <---- reset ----  WindowTimer (background task)
//!        |
//!        v
//!   TokenManager ----> /auth/cert/key, /auth/cert/
//!        |
//!        v
//!   DocumentSubmitter ----> /lk/documents/create
//! ```
//!
//! # Example
//!
//! ```no_run
//! use crpt_client::{ClientConfig, CrptClient, RateWindow};
//! use crpt_client::documents::GoodsIntroductionDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rt = tokio::runtime::Runtime::new()?;
//! rt.block_on(async {
//!     let window = RateWindow::per_second(5)?;
//!     let client = CrptClient::new(ClientConfig::new(window))?;
//!
//!     let document = GoodsIntroductionDocument::own_production()
//!         .with_participant_inn("1234567890");
//!     client.submit_document(&document, "signature").await?;
//!
//!     client.shutdown().await;
//!     Ok(())
//! })
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod documents;
pub mod error;
pub mod gate;
pub mod transport;

pub use client::CrptClient;
pub use config::{ClientConfig, RateWindow};
pub use error::{AdmissionError, AuthError, ConfigError, Error, SubmitError};
pub use gate::{Admission, RequestGate, WindowTimer};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
