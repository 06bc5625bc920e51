use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Full invoice as extracted by the remote service, with its line items.
///
/// Field names follow the wire format of the extraction API (PascalCase).
/// Only the identifier is mandatory; everything else may be missing when
/// extraction could not find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceRecord {
    pub invoice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address_recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_total: Option<f64>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl InvoiceRecord {
    pub fn invoice_date_parsed(&self) -> Option<NaiveDate> {
        self.invoice_date.as_deref().and_then(parse_invoice_date)
    }

    /// Summary projection used by list endpoints.
    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary {
            invoice_id: self.invoice_id.clone(),
            vendor_name: self.vendor_name.clone(),
            invoice_date: self.invoice_date.clone(),
            shipping_address: self.shipping_address.clone(),
            invoice_total: self.invoice_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// One row of an invoice search or listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceSummary {
    pub invoice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_total: Option<f64>,
}

impl InvoiceSummary {
    pub fn invoice_date_parsed(&self) -> Option<NaiveDate> {
        self.invoice_date.as_deref().and_then(parse_invoice_date)
    }
}

/// Invoice list returned by vendor search and the full listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub invoices: Vec<InvoiceSummary>,
    pub count: usize,
}

impl InvoiceList {
    pub fn new(invoices: Vec<InvoiceSummary>) -> Self {
        let count = invoices.len();
        Self { invoices, count }
    }
}

/// Result of submitting a document to the extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Parse an invoice date as sent by the extraction service.
///
/// Accepts plain `YYYY-MM-DD` dates and full RFC 3339 timestamps.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
