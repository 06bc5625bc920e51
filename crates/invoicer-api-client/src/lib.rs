//! HTTP client for the invoice extraction API.
//!
//! Provides a minimal client with GET and multipart POST helpers, explicit
//! response normalization, and domain methods (upload, fetch by id, search by
//! vendor). The upload queue and the CLI use this client directly.

pub mod api;
pub mod cache;
pub mod error;
pub mod normalize;

use reqwest::Client;
use std::time::Duration;

pub use cache::InvoiceCache;
pub use error::ClientError;

use error::extract_server_message;
use invoicer_core::ClientConfig;

/// HTTP client for the invoice extraction API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Returns the JSON body for later normalization.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.build_url(path);
        let response = self.client.get(&url).send().await?;
        Self::read_json(response).await
    }

    /// POST multipart form. Returns the JSON body for later normalization.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.build_url(path);
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(status = %status, body = %error_text, "API request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: extract_server_message(&error_text),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::MalformedResponse(format!("Response is not valid JSON: {}", e))
        })
    }
}

// Re-export domain response types for convenience.
pub use invoicer_core::models::{
    HealthStatus, InvoiceList, InvoiceRecord, InvoiceSummary, LineItem, UploadResponse,
};
