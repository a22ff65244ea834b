//! Backend gateway.
//!
//! This module defines the async gateway trait the flows talk to, the
//! response envelope, and the reqwest-backed implementation.

mod envelope;
mod error;
mod http;

pub use envelope::ApiResponse;
pub use error::ApiError;
pub use http::HttpGateway;

use async_trait::async_trait;

use crate::record::SteganographyRecord;
use crate::upload::ImageFile;

/// Result of an extraction: the hidden text and whether its hash matched
/// the anchored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Text recovered from the image.
    pub text: String,
    /// Integrity verdict; independent of the call having succeeded.
    pub verified: bool,
    /// Backend message, if any.
    pub message: Option<String>,
}

/// Result of a text-only integrity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub verified: bool,
    pub message: Option<String>,
}

/// Backend health as reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    /// Backend clock in milliseconds since the epoch.
    pub timestamp: Option<i64>,
}

/// One operation per backend endpoint.
#[async_trait]
pub trait StegoGateway: Send + Sync {
    /// `POST /hide` - hide `text` in `image` and anchor its hash.
    async fn hide_text(&self, image: &ImageFile, text: &str)
        -> Result<SteganographyRecord, ApiError>;

    /// `POST /extract` - extract text from `image` and verify it against the
    /// hash anchored by `transaction_hash`.
    async fn extract_text(
        &self,
        image: &ImageFile,
        transaction_hash: &str,
    ) -> Result<Extraction, ApiError>;

    /// `POST /verify` - verify `text` against an anchored hash.
    async fn verify_text(&self, text: &str, transaction_hash: &str)
        -> Result<Verification, ApiError>;

    /// `GET /records`.
    async fn get_all_records(&self) -> Result<Vec<SteganographyRecord>, ApiError>;

    /// `GET /records/{id}`.
    async fn get_record_by_id(&self, id: &str) -> Result<SteganographyRecord, ApiError>;

    /// `GET /records/transaction/{hash}`.
    async fn get_record_by_transaction_hash(
        &self,
        transaction_hash: &str,
    ) -> Result<SteganographyRecord, ApiError>;

    /// `POST /hash` - backend-computed digest of `text`.
    async fn generate_hash(&self, text: &str) -> Result<String, ApiError>;

    /// `GET /health`.
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}
