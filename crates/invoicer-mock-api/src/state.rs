//! In-memory invoice store shared by all handlers.

use invoicer_core::models::{InvoiceRecord, InvoiceSummary};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::fixtures::seed_invoices;

#[derive(Debug, Default)]
pub struct MockApiState {
    invoices: RwLock<BTreeMap<String, InvoiceRecord>>,
}

impl MockApiState {
    pub fn new(invoices: Vec<InvoiceRecord>) -> Self {
        let invoices = invoices
            .into_iter()
            .map(|invoice| (invoice.invoice_id.clone(), invoice))
            .collect();
        Self {
            invoices: RwLock::new(invoices),
        }
    }

    /// State preloaded with the fixture invoices.
    pub fn seeded() -> Self {
        Self::new(seed_invoices())
    }

    pub async fn get(&self, invoice_id: &str) -> Option<InvoiceRecord> {
        self.invoices.read().await.get(invoice_id).cloned()
    }

    /// Summaries of every invoice, ordered by id.
    pub async fn list(&self) -> Vec<InvoiceSummary> {
        self.invoices
            .read()
            .await
            .values()
            .map(InvoiceRecord::summary)
            .collect()
    }

    /// Invoices whose vendor name contains `query`, ignoring case.
    pub async fn search_vendor(&self, query: &str) -> Vec<InvoiceSummary> {
        let needle = query.to_lowercase();
        self.invoices
            .read()
            .await
            .values()
            .filter(|invoice| {
                invoice
                    .vendor_name
                    .as_deref()
                    .map(|vendor| vendor.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .map(InvoiceRecord::summary)
            .collect()
    }

    /// Insert unless the id is taken. Returns whether the invoice was stored.
    pub async fn insert_new(&self, invoice: InvoiceRecord) -> bool {
        let mut invoices = self.invoices.write().await;
        if invoices.contains_key(&invoice.invoice_id) {
            return false;
        }
        invoices.insert(invoice.invoice_id.clone(), invoice);
        true
    }

    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_vendor_substring_ignores_case() {
        let state = MockApiState::seeded();

        let results = state.search_vendor("superstore").await;
        let ids: Vec<_> = results.iter().map(|i| i.invoice_id.as_str()).collect();
        assert_eq!(ids, vec!["INV-005", "INV-006", "INV-007"]);

        assert_eq!(state.search_vendor("BERG").await.len(), 2);
        assert!(state.search_vendor("Globex").await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let state = MockApiState::default();
        assert_eq!(state.len().await, 0);

        let mut invoice = seed_invoices().remove(0);
        invoice.invoice_id = "INV-1234".to_string();
        assert!(state.insert_new(invoice).await);

        assert_eq!(state.len().await, 1);
        assert_eq!(state.get("INV-1234").await.unwrap().items.len(), 2);
        assert!(state.get("INV-001").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_new_refuses_taken_id() {
        let state = MockApiState::seeded();
        let mut invoice = seed_invoices().remove(1);
        invoice.vendor_name = Some("Someone Else".to_string());

        assert!(!state.insert_new(invoice.clone()).await);
        assert_eq!(
            state.get("INV-002").await.unwrap().vendor_name.as_deref(),
            Some("Acme Corp")
        );

        invoice.invoice_id = "INV-0002".to_string();
        assert!(state.insert_new(invoice).await);
        assert_eq!(state.len().await, 8);
    }
}
