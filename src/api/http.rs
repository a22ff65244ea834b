//! reqwest implementation of the gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};

use super::{ApiError, ApiResponse, Extraction, HealthStatus, StegoGateway, Verification};
use crate::config::ClientConfig;
use crate::record::SteganographyRecord;
use crate::upload::ImageFile;

/// HTTP gateway to the steganography backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Creates a gateway for `base_url`; every call fails as a transport
    /// error once `timeout` elapses.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("stegchain/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Creates a gateway from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.timeout())
    }

    /// Base URL all paths are joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and decodes the envelope.
    ///
    /// Non-2xx responses with a parseable envelope become `Backend` (or
    /// `NotFound` for 404); anything without a usable body is a transport
    /// failure.
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<ApiResponse, ApiError> {
        tracing::debug!(path, "sending request");
        let response = request.send().await.map_err(|e| self.transport_error(path, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(path, e))?;
        let envelope = serde_json::from_slice::<ApiResponse>(&body);

        let result = match envelope {
            Ok(env) if status.is_success() && env.success => Ok(env),
            Ok(env) if status == StatusCode::NOT_FOUND => Err(ApiError::NotFound(
                env.message().unwrap_or_default().to_string(),
            )),
            Ok(env) => Err(ApiError::Backend {
                status: (!status.is_success()).then_some(status.as_u16()),
                message: env.message().unwrap_or_default().to_string(),
                verified: env.verified,
            }),
            Err(e) if status.is_success() => Err(ApiError::Decode(e.to_string())),
            Err(_) if status == StatusCode::NOT_FOUND => Err(ApiError::NotFound(String::new())),
            Err(_) => Err(ApiError::Transport(format!("HTTP {}", status))),
        };

        match &result {
            Ok(_) => tracing::debug!(path, status = status.as_u16(), "request succeeded"),
            Err(e) => tracing::warn!(path, status = status.as_u16(), error = %e, "request failed"),
        }
        result
    }

    fn transport_error(&self, path: &str, err: reqwest::Error) -> ApiError {
        tracing::warn!(path, error = %err, "transport failure");
        if err.is_timeout() {
            ApiError::Transport(format!("request timed out after {:?}", self.timeout))
        } else {
            ApiError::from(err)
        }
    }

    fn image_part(image: &ImageFile) -> Result<Part, ApiError> {
        Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.media_type())
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    async fn fetch_record(&self, path: &str) -> Result<SteganographyRecord, ApiError> {
        let env = self.send(path, self.client.get(self.url(path))).await?;
        let message = env.message().unwrap_or_default().to_string();
        env.record.ok_or(ApiError::NotFound(message))
    }
}

#[async_trait]
impl StegoGateway for HttpGateway {
    async fn hide_text(
        &self,
        image: &ImageFile,
        text: &str,
    ) -> Result<SteganographyRecord, ApiError> {
        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("text", text.to_string());
        let env = self
            .send("/hide", self.client.post(self.url("/hide")).multipart(form))
            .await?;
        let message = env.message().unwrap_or_default().to_string();
        env.record.ok_or(ApiError::Backend {
            status: None,
            message,
            verified: None,
        })
    }

    async fn extract_text(
        &self,
        image: &ImageFile,
        transaction_hash: &str,
    ) -> Result<Extraction, ApiError> {
        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("transactionHash", transaction_hash.to_string());
        let env = self
            .send("/extract", self.client.post(self.url("/extract")).multipart(form))
            .await?;
        Ok(Extraction {
            text: env.extracted_text.clone().unwrap_or_default(),
            verified: env.verified.unwrap_or(false),
            message: env.message().map(str::to_string),
        })
    }

    async fn verify_text(
        &self,
        text: &str,
        transaction_hash: &str,
    ) -> Result<Verification, ApiError> {
        let form = Form::new()
            .text("text", text.to_string())
            .text("transactionHash", transaction_hash.to_string());
        let env = self
            .send("/verify", self.client.post(self.url("/verify")).multipart(form))
            .await?;
        Ok(Verification {
            verified: env.verification_flag().unwrap_or(false),
            message: env.message().map(str::to_string),
        })
    }

    async fn get_all_records(&self) -> Result<Vec<SteganographyRecord>, ApiError> {
        let env = self
            .send("/records", self.client.get(self.url("/records")))
            .await?;
        env.records
            .ok_or_else(|| ApiError::Decode("response carries no records".to_string()))
    }

    async fn get_record_by_id(&self, id: &str) -> Result<SteganographyRecord, ApiError> {
        self.fetch_record(&format!("/records/{}", urlencoding::encode(id)))
            .await
    }

    async fn get_record_by_transaction_hash(
        &self,
        transaction_hash: &str,
    ) -> Result<SteganographyRecord, ApiError> {
        self.fetch_record(&format!(
            "/records/transaction/{}",
            urlencoding::encode(transaction_hash)
        ))
        .await
    }

    async fn generate_hash(&self, text: &str) -> Result<String, ApiError> {
        let form = Form::new().text("text", text.to_string());
        let env = self
            .send("/hash", self.client.post(self.url("/hash")).multipart(form))
            .await?;
        env.hash
            .ok_or_else(|| ApiError::Decode("response carries no hash".to_string()))
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let env = self
            .send("/health", self.client.get(self.url("/health")))
            .await?;
        Ok(HealthStatus {
            healthy: env.data.as_ref().and_then(|d| d.as_bool()).unwrap_or(env.success),
            message: env.message().map(str::to_string),
            timestamp: env.timestamp,
        })
    }
}
