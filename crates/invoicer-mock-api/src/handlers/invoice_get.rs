use crate::error::HttpAppError;
use crate::state::MockApiState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use invoicer_core::models::InvoiceRecord;
use invoicer_core::AppError;
use serde::Serialize;
use std::sync::Arc;

/// Single invoices are wrapped in an `invoice` envelope on the wire.
#[derive(Debug, Serialize)]
pub struct InvoiceEnvelope {
    pub invoice: InvoiceRecord,
}

#[tracing::instrument(skip(state), fields(invoice_id = %id, operation = "get_invoice"))]
pub async fn get_invoice(
    Path(id): Path<String>,
    State(state): State<Arc<MockApiState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let invoice = state
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(InvoiceEnvelope { invoice }))
}
