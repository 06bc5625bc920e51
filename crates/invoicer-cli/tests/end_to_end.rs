//! Upload and lookup against an in-process mock API.
//!
//! Run with: `cargo test -p invoicer-cli --test end_to_end`

use invoicer_api_client::{ApiClient, InvoiceCache};
use invoicer_cli::files::candidate_from_path;
use invoicer_core::models::UploadState;
use invoicer_core::{paginate, sort_invoices, MockServerConfig, SortKey, DEFAULT_PAGE_SIZE};
use invoicer_worker::{UploadQueue, UploadQueueConfig};
use std::sync::Arc;
use std::time::Duration;

async fn spawn_mock_api() -> String {
    let config = MockServerConfig {
        server_port: 0,
        environment: "test".to_string(),
    };
    let (_state, router) = invoicer_mock_api::setup::initialize_app(&config)
        .await
        .expect("Failed to initialize mock API");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_upload_then_fetch_extracted_invoice() {
    let base_url = spawn_mock_api().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("march.pdf");
    tokio::fs::write(&pdf, b"%PDF-1.4 invoice").await.unwrap();
    let notes = dir.path().join("notes.txt");
    tokio::fs::write(&notes, b"not an invoice").await.unwrap();

    let queue = UploadQueue::new(Arc::new(client.clone()), UploadQueueConfig::default());
    let outcome = queue.add_files(vec![
        candidate_from_path(&pdf, None).await.unwrap(),
        candidate_from_path(&notes, None).await.unwrap(),
    ]);
    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.rejected, 1);

    let summary = queue.submit_all_pending().await;
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);

    let record = queue.record("march.pdf").unwrap();
    assert_eq!(record.state, UploadState::Success);
    let invoice_id = record.invoice_id.clone().unwrap();
    assert!(invoice_id.starts_with("INV-"));
    queue.shutdown().await;

    let invoice = client.get_invoice(&invoice_id).await.unwrap();
    assert_eq!(invoice.vendor_name.as_deref(), Some("Unknown Vendor"));
    assert!(invoice.items.is_empty());
}

#[tokio::test]
async fn test_vendor_search_sorted_and_paged() {
    let base_url = spawn_mock_api().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let mut list = client.get_invoices_by_vendor("SuperStore").await.unwrap();
    assert_eq!(list.count, 3);

    sort_invoices(&mut list.invoices, SortKey::Amount);
    let page = paginate(&list.invoices, 1, DEFAULT_PAGE_SIZE);
    let ids: Vec<_> = page.items.iter().map(|i| i.invoice_id.as_str()).collect();
    assert_eq!(ids, vec!["INV-005", "INV-007", "INV-006"]);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_cached_lookup_and_not_found() {
    let base_url = spawn_mock_api().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();
    let cache = InvoiceCache::new(8);

    let invoice = client.get_invoice_cached(&cache, "INV-006").await.unwrap();
    assert_eq!(invoice.items.len(), 2);
    assert_eq!(invoice.invoice_total, Some(2880.0));
    assert_eq!(cache.len(), 1);

    let err = client.get_invoice("INV-404").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Invoice not found"));
}
