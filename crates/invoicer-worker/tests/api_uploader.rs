use std::sync::Arc;
use std::time::Duration;

use invoicer_api_client::ApiClient;
use invoicer_core::models::{CandidateFile, UploadState};
use invoicer_worker::{BatchSummary, UploadQueue, UploadQueueConfig};

#[tokio::test]
async fn test_queue_uploads_through_api_client() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("POST", "/extract")
        .match_body(mockito::Matcher::Regex(r#"filename="good.pdf""#.to_string()))
        .with_status(200)
        .with_body(r#"{"invoiceId":"INV-0042","status":"processed"}"#)
        .create_async()
        .await;
    let failed = server
        .mock("POST", "/extract")
        .match_body(mockito::Matcher::Regex(r#"filename="bad.png""#.to_string()))
        .with_status(500)
        .with_body(r#"{"message":"Extraction service unavailable"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), Duration::from_secs(5)).unwrap();
    let queue = UploadQueue::new(Arc::new(client), UploadQueueConfig::default());

    let outcome = queue.add_files(vec![
        CandidateFile::from_bytes("good.pdf", "application/pdf", b"%PDF".to_vec()),
        CandidateFile::from_bytes("bad.png", "image/png", b"\x89PNG".to_vec()),
    ]);
    assert_eq!(outcome.accepted, 2);

    let summary = queue.submit_all_pending().await;
    assert_eq!(summary, BatchSummary { succeeded: 1, failed: 1 });

    let good = queue.record("good.pdf").unwrap();
    assert_eq!(good.state, UploadState::Success);
    assert_eq!(good.invoice_id.as_deref(), Some("INV-0042"));

    let bad = queue.record("bad.png").unwrap();
    assert_eq!(bad.state, UploadState::Error);
    assert_eq!(bad.message.as_deref(), Some("Extraction service unavailable"));

    ok.assert_async().await;
    failed.assert_async().await;
    queue.shutdown().await;
}
