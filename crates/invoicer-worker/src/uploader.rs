use async_trait::async_trait;
use invoicer_api_client::{ApiClient, ClientError};
use invoicer_core::models::{CandidateFile, UploadResponse};

/// Remote side of the upload queue.
///
/// The queue only needs "submit this file, tell me the assigned id or why it
/// failed"; `ApiClient` is the production implementation.
#[async_trait]
pub trait InvoiceUploader: Send + Sync {
    async fn upload(&self, file: &CandidateFile) -> Result<UploadResponse, ClientError>;
}

#[async_trait]
impl InvoiceUploader for ApiClient {
    async fn upload(&self, file: &CandidateFile) -> Result<UploadResponse, ClientError> {
        self.upload_invoice(file).await
    }
}
