//! Test doubles for the upload queue.

use crate::uploader::InvoiceUploader;
use async_trait::async_trait;
use invoicer_api_client::ClientError;
use invoicer_core::models::{CandidateFile, UploadResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

type UploadResult = Result<UploadResponse, ClientError>;

enum MockResponse {
    Immediate(UploadResult),
    /// Completes only once the paired sender fires (or is dropped).
    Triggered {
        response: UploadResult,
        trigger: oneshot::Receiver<()>,
    },
}

/// Uploader with scripted per-file responses, a call log and in-flight
/// accounting.
#[derive(Default)]
pub struct MockUploader {
    responses: Mutex<HashMap<String, Vec<MockResponse>>>,
    calls: Mutex<Vec<String>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `file_name`. Responses for the same name are
    /// returned in FIFO order.
    pub fn add_response(&self, file_name: &str, response: UploadResult) {
        self.responses
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push(MockResponse::Immediate(response));
    }

    /// Queue a response that blocks until the returned sender fires.
    pub fn add_response_with_trigger(
        &self,
        file_name: &str,
        response: UploadResult,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push(MockResponse::Triggered {
                response,
                trigger: rx,
            });
        tx
    }

    /// File names in the order uploads started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous uploads observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvoiceUploader for MockUploader {
    async fn upload(&self, file: &CandidateFile) -> UploadResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
        };

        self.calls.lock().unwrap().push(file.name.clone());

        let response = {
            let mut responses = self.responses.lock().unwrap();
            responses
                .get_mut(&file.name)
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };

        match response {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Triggered { response, trigger }) => {
                let _ = trigger.await;
                response
            }
            None => Err(ClientError::Http(format!(
                "No mock response configured for {}",
                file.name
            ))),
        }
    }
}

/// Decrements the in-flight counter even if the upload future is dropped.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
