//! Goods document types and submission
//!
//! Wire-format document payloads for introducing goods into circulation,
//! plus the submitter that posts them as signed multipart requests.

pub mod submitter;
pub mod types;

pub use submitter::{DocumentSubmitter, CREATE_DOCUMENT_PATH};
pub use types::{GoodsIntroductionDocument, Product, PRODUCTION_TYPE_OWN};
