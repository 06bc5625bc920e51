//! Response normalization.
//!
//! The extraction service is not consistent about envelopes: records may be
//! bare or wrapped in `{ "invoice": ... }`, and line items may sit next to the
//! wrapper or inside it. Everything funnels through these functions, which
//! either produce a typed record or fail with `MalformedResponse`.

use crate::error::ClientError;
use invoicer_core::models::{HealthStatus, InvoiceList, InvoiceRecord, InvoiceSummary, UploadResponse};
use serde_json::{Map, Value};

fn malformed(what: &str, detail: impl std::fmt::Display) -> ClientError {
    ClientError::MalformedResponse(format!("{}: {}", what, detail))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ClientError> {
    value
        .as_object()
        .ok_or_else(|| malformed(what, "expected a JSON object"))
}

/// Unwrap `{ "invoice": {...} }`; anything else is taken as the record itself.
fn unwrap_invoice(value: &Value) -> &Value {
    match value.get("invoice") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    }
}

/// Identifiers are strings on the wire, but numeric ids are tolerated.
fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_invoice_id(object: &mut Map<String, Value>, what: &str) -> Result<(), ClientError> {
    let id = object
        .get("InvoiceId")
        .and_then(id_to_string)
        .ok_or_else(|| malformed(what, "missing InvoiceId"))?;
    object.insert("InvoiceId".to_string(), Value::String(id));
    Ok(())
}

/// Normalize the body of `POST /extract`.
pub fn upload_response(value: Value) -> Result<UploadResponse, ClientError> {
    let object = as_object(&value, "upload response")?;

    let invoice_id = ["invoiceId", "InvoiceId", "invoice_id"]
        .iter()
        .find_map(|key| object.get(*key).and_then(id_to_string));

    let text = |key: &str| object.get(key).and_then(|v| v.as_str()).map(String::from);

    Ok(UploadResponse {
        invoice_id,
        vendor: text("vendor"),
        amount: object.get("amount").and_then(|v| v.as_f64()),
        status: text("status"),
        message: text("message"),
    })
}

/// Normalize the body of `GET /invoice/{id}`.
///
/// Line items come from the top-level `items` array when present, then from
/// the record's own `Items`, else empty.
pub fn invoice_record(value: Value) -> Result<InvoiceRecord, ClientError> {
    as_object(&value, "invoice")?;

    let mut record = as_object(unwrap_invoice(&value), "invoice")?.clone();
    normalize_invoice_id(&mut record, "invoice")?;

    let items = value
        .get("items")
        .filter(|v| v.is_array())
        .or_else(|| record.get("Items").filter(|v| v.is_array()))
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    record.insert("Items".to_string(), items);

    serde_json::from_value(Value::Object(record)).map_err(|e| malformed("invoice", e))
}

/// Normalize one element of an invoice list, flat or wrapped.
pub fn invoice_summary(value: &Value) -> Result<InvoiceSummary, ClientError> {
    let mut summary = as_object(unwrap_invoice(value), "invoice summary")?.clone();
    normalize_invoice_id(&mut summary, "invoice summary")?;
    serde_json::from_value(Value::Object(summary)).map_err(|e| malformed("invoice summary", e))
}

/// Normalize `{ "invoices": [...] }`. The count is always the list length,
/// whatever the server reported.
pub fn invoice_list(value: Value) -> Result<InvoiceList, ClientError> {
    let object = as_object(&value, "invoice list")?;
    let invoices = object
        .get("invoices")
        .and_then(|v| v.as_array())
        .ok_or_else(|| malformed("invoice list", "missing invoices array"))?;

    let invoices = invoices
        .iter()
        .map(invoice_summary)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InvoiceList::new(invoices))
}

pub fn health(value: Value) -> Result<HealthStatus, ClientError> {
    serde_json::from_value(value).map_err(|e| malformed("health", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_response_camel_case() {
        let response = upload_response(json!({
            "invoiceId": "INV-0042",
            "vendor": "Unknown Vendor",
            "amount": 0,
            "status": "processed",
            "message": "Invoice processed successfully"
        }))
        .unwrap();

        assert_eq!(response.invoice_id.as_deref(), Some("INV-0042"));
        assert_eq!(response.vendor.as_deref(), Some("Unknown Vendor"));
        assert_eq!(response.amount, Some(0.0));
    }

    #[test]
    fn test_upload_response_alternate_id_keys() {
        let response = upload_response(json!({ "InvoiceId": 17 })).unwrap();
        assert_eq!(response.invoice_id.as_deref(), Some("17"));

        let response = upload_response(json!({ "invoice_id": "INV-9" })).unwrap();
        assert_eq!(response.invoice_id.as_deref(), Some("INV-9"));

        let response = upload_response(json!({ "status": "queued" })).unwrap();
        assert_eq!(response.invoice_id, None);
    }

    #[test]
    fn test_upload_response_rejects_non_object() {
        assert!(matches!(
            upload_response(json!(["INV-1"])),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invoice_record_wrapped_with_items_alongside() {
        let record = invoice_record(json!({
            "invoice": {
                "InvoiceId": "INV-001",
                "VendorName": "Aaron Bergman",
                "Items": [{ "id": "9", "Name": "ignored" }]
            },
            "items": [{ "id": "1", "Name": "Office Supplies", "Amount": 500.0 }]
        }))
        .unwrap();

        assert_eq!(record.invoice_id, "INV-001");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].name.as_deref(), Some("Office Supplies"));
    }

    #[test]
    fn test_invoice_record_wrapped_with_inner_items() {
        let record = invoice_record(json!({
            "invoice": {
                "InvoiceId": "INV-006",
                "Items": [{ "id": "1" }, { "id": "2" }]
            }
        }))
        .unwrap();
        assert_eq!(record.items.len(), 2);
    }

    #[test]
    fn test_invoice_record_flat_without_items() {
        let record = invoice_record(json!({
            "InvoiceId": "INV-003",
            "VendorName": "TechSupply Inc",
            "InvoiceTotal": 825.0
        }))
        .unwrap();
        assert_eq!(record.vendor_name.as_deref(), Some("TechSupply Inc"));
        assert!(record.items.is_empty());
    }

    #[test]
    fn test_invoice_record_malformed() {
        assert!(matches!(
            invoice_record(json!({ "invoice": { "VendorName": "No Id" } })),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            invoice_record(json!("INV-001")),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            invoice_record(json!({ "InvoiceId": "INV-1", "InvoiceTotal": "lots" })),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invoice_list_mixed_shapes() {
        let list = invoice_list(json!({
            "invoices": [
                { "invoice": { "InvoiceId": "INV-005", "VendorName": "SuperStore" } },
                { "InvoiceId": "INV-006", "VendorName": "SuperStore", "InvoiceTotal": 2880.0 }
            ],
            "count": 99
        }))
        .unwrap();

        assert_eq!(list.count, 2);
        assert_eq!(list.invoices[0].invoice_id, "INV-005");
        assert_eq!(list.invoices[1].invoice_total, Some(2880.0));
    }

    #[test]
    fn test_invoice_list_missing_array() {
        assert!(matches!(
            invoice_list(json!({ "count": 0 })),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            invoice_list(json!({ "invoices": [{ "VendorName": "x" }] })),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invoice_list_empty() {
        let list = invoice_list(json!({ "invoices": [], "count": 0 })).unwrap();
        assert_eq!(list.count, 0);
        assert!(list.invoices.is_empty());
    }
}
