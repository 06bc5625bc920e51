//! Domain methods for the invoice API client.

use crate::cache::InvoiceCache;
use crate::error::ClientError;
use crate::{normalize, ApiClient};
use invoicer_core::models::{
    CandidateFile, FileSource, HealthStatus, InvoiceList, InvoiceRecord, UploadResponse,
};
use invoicer_core::validation::MAX_FILE_SIZE_BYTES;
use std::path::Path;
use tokio::io::AsyncReadExt;

impl ApiClient {
    /// Submit a document for extraction (`POST /extract`, multipart field `file`).
    #[tracing::instrument(skip(self, file), fields(file_name = %file.name, byte_size = file.byte_size))]
    pub async fn upload_invoice(&self, file: &CandidateFile) -> Result<UploadResponse, ClientError> {
        let data = match &file.source {
            FileSource::Memory(bytes) => bytes.to_vec(),
            FileSource::Path(path) => read_bounded(path, MAX_FILE_SIZE_BYTES).await?,
        };

        let mut part = reqwest::multipart::Part::bytes(data).file_name(file.name.clone());
        if !file.declared_type.trim().is_empty() {
            part = part
                .mime_str(file.declared_type.trim())
                .map_err(|e| ClientError::Http(format!("Invalid media type: {}", e)))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let body = self.post_multipart("/extract", form).await?;
        let response = normalize::upload_response(body)?;

        tracing::info!(invoice_id = ?response.invoice_id, "Invoice submitted for extraction");
        Ok(response)
    }

    /// Fetch one invoice with its line items.
    #[tracing::instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: &str) -> Result<InvoiceRecord, ClientError> {
        let path = format!("/invoice/{}", urlencoding::encode(invoice_id));
        let body = self.get(&path).await?;
        normalize::invoice_record(body)
    }

    /// Fetch an invoice, consulting `cache` first and filling it on a miss.
    pub async fn get_invoice_cached(
        &self,
        cache: &InvoiceCache,
        invoice_id: &str,
    ) -> Result<InvoiceRecord, ClientError> {
        if let Some(record) = cache.get(invoice_id) {
            tracing::debug!(invoice_id = %invoice_id, "Invoice cache hit");
            return Ok(record);
        }

        let record = self.get_invoice(invoice_id).await?;
        cache.put(record.clone());
        Ok(record)
    }

    /// Search invoices whose vendor name matches `vendor_name`.
    #[tracing::instrument(skip(self))]
    pub async fn get_invoices_by_vendor(&self, vendor_name: &str) -> Result<InvoiceList, ClientError> {
        let path = format!("/invoices/vendor/{}", urlencoding::encode(vendor_name));
        let body = self.get(&path).await?;
        let list = normalize::invoice_list(body)?;
        tracing::debug!(count = list.count, "Vendor search complete");
        Ok(list)
    }

    /// List every invoice the service knows about.
    #[tracing::instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<InvoiceList, ClientError> {
        let body = self.get("/invoices").await?;
        normalize::invoice_list(body)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let body = self.get("/health").await?;
        normalize::health(body)
    }
}

/// Read a local file, refusing it once more than `max` bytes come back.
///
/// The file may have grown since it was validated, so the ceiling is checked
/// against what is actually read.
async fn read_bounded(path: &Path, max: u64) -> Result<Vec<u8>, ClientError> {
    let io_error = |source| ClientError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let mut data = Vec::new();
    file.take(max + 1)
        .read_to_end(&mut data)
        .await
        .map_err(io_error)?;

    if data.len() as u64 > max {
        tracing::warn!(path = %path.display(), max, "Local file exceeds the size ceiling");
        return Err(ClientError::FileTooLarge {
            path: path.to_path_buf(),
            max,
        });
    }

    Ok(data)
}
