use crate::state::MockApiState;
use axum::{
    extract::{Path, State},
    Json,
};
use invoicer_core::models::{InvoiceList, InvoiceSummary};
use serde::Serialize;
use std::sync::Arc;

/// Full listing. `total` repeats `count`; there is no server-side paging.
#[derive(Debug, Serialize)]
pub struct InvoiceListing {
    pub invoices: Vec<InvoiceSummary>,
    pub count: usize,
    pub total: usize,
}

#[tracing::instrument(skip(state), fields(operation = "list_invoices"))]
pub async fn list_invoices(State(state): State<Arc<MockApiState>>) -> Json<InvoiceListing> {
    let invoices = state.list().await;
    let count = invoices.len();
    Json(InvoiceListing {
        invoices,
        count,
        total: count,
    })
}

/// Case-insensitive substring match on the vendor name. The path segment
/// arrives percent-decoded.
#[tracing::instrument(skip(state), fields(vendor = %name, operation = "search_vendor"))]
pub async fn search_by_vendor(
    Path(name): Path<String>,
    State(state): State<Arc<MockApiState>>,
) -> Json<InvoiceList> {
    let invoices = state.search_vendor(&name).await;
    tracing::debug!(matches = invoices.len(), "Vendor search complete");
    Json(InvoiceList::new(invoices))
}
