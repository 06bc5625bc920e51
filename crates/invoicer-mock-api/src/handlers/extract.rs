//! Mock extraction endpoint.
//!
//! Accepts a multipart upload with a `file` field, registers a placeholder
//! invoice under a fresh `INV-NNNN` id and reports it as processed. The
//! document itself is not inspected.

use crate::error::HttpAppError;
use crate::state::MockApiState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use invoicer_core::models::{InvoiceRecord, UploadResponse};
use invoicer_core::AppError;
use rand::Rng;
use std::sync::Arc;

pub const PLACEHOLDER_VENDOR: &str = "Unknown Vendor";
const ID_ATTEMPTS: usize = 32;

struct UploadedFile {
    file_name: String,
    content_type: String,
    size: usize,
}

async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if uploaded.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        uploaded = Some(UploadedFile {
            file_name,
            content_type,
            size: data.len(),
        });
    }

    uploaded.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}

/// `INV-` followed by four zero-padded random digits.
fn random_invoice_id() -> String {
    format!("INV-{:04}", rand::rng().random_range(0..10_000u32))
}

fn placeholder_invoice(invoice_id: String) -> InvoiceRecord {
    InvoiceRecord {
        invoice_id,
        vendor_name: Some(PLACEHOLDER_VENDOR.to_string()),
        invoice_date: Some(chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        billing_address_recipient: None,
        shipping_address: None,
        sub_total: Some(0.0),
        shipping_cost: Some(0.0),
        invoice_total: Some(0.0),
        items: Vec::new(),
    }
}

#[tracing::instrument(skip(state, multipart), fields(operation = "extract_invoice"))]
pub async fn extract_invoice(
    State(state): State<Arc<MockApiState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;

    tracing::info!(
        file_name = %file.file_name,
        content_type = %file.content_type,
        size = file.size,
        "Upload received"
    );

    for _ in 0..ID_ATTEMPTS {
        let invoice_id = random_invoice_id();
        if state.insert_new(placeholder_invoice(invoice_id.clone())).await {
            tracing::info!(invoice_id = %invoice_id, "Invoice registered");
            return Ok(Json(UploadResponse {
                invoice_id: Some(invoice_id),
                vendor: Some(PLACEHOLDER_VENDOR.to_string()),
                amount: Some(0.0),
                status: Some("processed".to_string()),
                message: Some("Invoice processed successfully".to_string()),
            }));
        }
    }

    Err(AppError::Internal("Could not allocate an invoice id".to_string()).into())
}
