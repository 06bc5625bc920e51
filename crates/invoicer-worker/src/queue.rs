//! Upload queue controller
//!
//! Owns the ordered list of selected files and their ledger. Submissions are
//! handed to a single worker task over a bounded channel, so at most one
//! upload is ever in flight. Queue state sits behind a mutex that is never
//! held across an await point.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use invoicer_api_client::ClientError;
use invoicer_core::models::{CandidateFile, Notification, UploadRecord, UploadState};
use invoicer_core::{FileValidator, ValidationError};

use crate::ledger::{LedgerError, UploadLedger};
use crate::uploader::InvoiceUploader;

const DEFAULT_QUEUE_SIZE: usize = 64;
const NOTIFICATION_CAPACITY: usize = 64;
const FALLBACK_FAILURE_MESSAGE: &str = "Upload failed";

#[derive(Debug, Clone)]
pub struct UploadQueueConfig {
    /// Bound of the job channel between callers and the worker.
    pub queue_size: usize,
    pub validator: FileValidator,
}

impl Default for UploadQueueConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            validator: FileValidator::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("File not in queue: {0}")]
    NotFound(String),

    #[error("{file_name} is {state}, only pending files can be submitted")]
    NotPending {
        file_name: String,
        state: UploadState,
    },

    #[error("Upload queue is shut down")]
    ShutDown,
}

impl From<LedgerError> for QueueError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(name) => QueueError::NotFound(name),
            LedgerError::InvalidTransition {
                file_name, from, ..
            } => QueueError::NotPending {
                file_name,
                state: from,
            },
        }
    }
}

/// Result of `add_files`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFilesOutcome {
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: Vec<(String, ValidationError)>,
}

/// Result of `submit_all_pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// One queued file together with its current record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    pub file_name: String,
    pub declared_type: String,
    pub byte_size: u64,
    pub record: UploadRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedInvoice {
    pub file_name: String,
    pub invoice_id: String,
}

impl UploadedInvoice {
    pub fn link(&self) -> String {
        format!("/invoice/{}", self.invoice_id)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    files: Vec<CandidateFile>,
    ledger: UploadLedger,
}

impl QueueState {
    fn position(&self, file_name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == file_name)
    }
}

struct UploadJob {
    file: CandidateFile,
    reply: oneshot::Sender<UploadRecord>,
}

/// Shared between the controller and its worker task.
struct Shared {
    state: Mutex<QueueState>,
    notifications: broadcast::Sender<Notification>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine.
        let _ = self.notifications.send(notification);
    }

    /// Apply the terminal transition for a finished upload and announce it.
    fn finish(
        &self,
        file_name: &str,
        outcome: Result<Option<String>, String>,
    ) -> UploadRecord {
        let result = {
            let mut state = self.lock();
            match &outcome {
                Ok(invoice_id) => state
                    .ledger
                    .complete_success(file_name, invoice_id.clone())
                    .cloned(),
                Err(message) => state.ledger.complete_error(file_name, message.clone()).cloned(),
            }
        };

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(file_name = %file_name, error = %e, "Upload finished for a record that was not uploading");
                let mut record = UploadRecord::pending(file_name);
                match outcome {
                    Ok(invoice_id) => {
                        record.state = UploadState::Success;
                        record.message =
                            Some(crate::ledger::success_message(invoice_id.as_deref()));
                        record.invoice_id = invoice_id;
                    }
                    Err(message) => {
                        record.state = UploadState::Error;
                        record.message = Some(message);
                    }
                }
                record
            }
        };

        match record.state {
            UploadState::Success => {
                self.notify(Notification::success(format!(
                    "{} uploaded successfully",
                    file_name
                )));
            }
            _ => {
                self.notify(Notification::error(format!("Failed to upload {}", file_name)));
            }
        }

        record
    }
}

/// Message recorded on a failed upload: the server's explanation when it gave
/// one, else the error description, else a fixed fallback.
pub fn failure_message(err: &ClientError) -> String {
    let message = err.user_message();
    if message.trim().is_empty() {
        FALLBACK_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

/// Upload queue controller
pub struct UploadQueue {
    shared: Arc<Shared>,
    validator: FileValidator,
    tx: mpsc::Sender<UploadJob>,
    worker: JoinHandle<()>,
}

impl UploadQueue {
    /// Create a queue and spawn its worker. Must be called within a tokio runtime.
    pub fn new(uploader: Arc<dyn InvoiceUploader>, config: UploadQueueConfig) -> Self {
        let queue_size = config.queue_size.max(1);
        let (tx, rx) = mpsc::channel(queue_size);
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            notifications,
        });

        let worker = tokio::spawn(Self::worker_loop(rx, uploader, shared.clone()));

        tracing::info!(queue_size = queue_size, "Upload queue initialized");

        Self {
            shared,
            validator: config.validator,
            tx,
            worker,
        }
    }

    /// Processes jobs strictly one after another; the next job is not received
    /// until the current upload has reached a terminal state.
    async fn worker_loop(
        mut rx: mpsc::Receiver<UploadJob>,
        uploader: Arc<dyn InvoiceUploader>,
        shared: Arc<Shared>,
    ) {
        while let Some(job) = rx.recv().await {
            let record = Self::process_job(&job.file, uploader.as_ref(), &shared).await;
            // The caller may have gone away; the transition is already applied.
            let _ = job.reply.send(record);
        }
        tracing::debug!("Upload worker stopped");
    }

    #[tracing::instrument(skip(file, uploader, shared), fields(file_name = %file.name, upload.status = tracing::field::Empty))]
    async fn process_job(
        file: &CandidateFile,
        uploader: &dyn InvoiceUploader,
        shared: &Shared,
    ) -> UploadRecord {
        let start = std::time::Instant::now();
        tracing::info!(byte_size = file.byte_size, "Starting upload");

        let outcome = match uploader.upload(file).await {
            Ok(response) => {
                tracing::Span::current().record("upload.status", "success");
                tracing::info!(
                    invoice_id = ?response.invoice_id,
                    duration_ms = start.elapsed().as_millis(),
                    "Upload completed successfully"
                );
                Ok(response.invoice_id)
            }
            Err(e) => {
                tracing::Span::current().record("upload.status", "failed");
                tracing::warn!(
                    error = %e,
                    duration_ms = start.elapsed().as_millis(),
                    "Upload failed"
                );
                Err(failure_message(&e))
            }
        };

        shared.finish(&file.name, outcome)
    }

    /// Validate and enqueue candidate files.
    ///
    /// Accepted files get a fresh `Pending` record. A name that matches a
    /// pending or uploading file (including one accepted earlier in this call)
    /// is rejected; a name that matches a finished upload replaces it.
    pub fn add_files<I>(&self, candidates: I) -> AddFilesOutcome
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let mut outcome = AddFilesOutcome::default();
        let mut replaced = HashSet::new();

        {
            let mut state = self.shared.lock();
            for file in candidates {
                let check = self.validator.check(&file).and_then(|()| {
                    match state.ledger.get(&file.name) {
                        Some(existing) if !existing.state.is_terminal() => {
                            Err(ValidationError::DuplicateName(file.name.clone()))
                        }
                        _ => Ok(()),
                    }
                });

                if let Err(e) = check {
                    tracing::debug!(file_name = %file.name, reason = %e, "File rejected");
                    outcome.rejected += 1;
                    outcome.rejections.push((file.name.clone(), e));
                    continue;
                }

                if let Some(index) = state.position(&file.name) {
                    state.files.remove(index);
                    replaced.insert(file.name.clone());
                }
                state.ledger.insert_pending(&file.name);
                state.files.push(file);
                outcome.accepted += 1;
            }
        }

        tracing::info!(
            accepted = outcome.accepted,
            rejected = outcome.rejected,
            replaced = replaced.len(),
            "Files added to upload queue"
        );

        if outcome.rejected > 0 {
            self.shared.notify(Notification::error(format!(
                "{} file(s) have invalid format or size",
                outcome.rejected
            )));
        }

        outcome
    }

    /// Remove a file and its record. Refused (returns `false`) while the file
    /// is uploading or when it is not queued.
    pub fn remove_file(&self, file_name: &str) -> bool {
        let mut state = self.shared.lock();

        if let Some(record) = state.ledger.get(file_name) {
            if record.state == UploadState::Uploading {
                tracing::debug!(file_name = %file_name, "Refusing to remove file while uploading");
                return false;
            }
        }

        let Some(index) = state.position(file_name) else {
            return false;
        };
        state.files.remove(index);
        state.ledger.remove(file_name);
        tracing::debug!(file_name = %file_name, "File removed from upload queue");
        true
    }

    /// Submit one pending file and wait for its terminal record.
    ///
    /// A channel slot is reserved before the record leaves `Pending`, so a
    /// caller dropped while the queue is full leaves the file untouched. Once
    /// the file is `Uploading` the outcome is always reported as a record.
    pub async fn submit_one(&self, file_name: &str) -> Result<UploadRecord, QueueError> {
        let permit = self.tx.reserve().await.map_err(|_| QueueError::ShutDown)?;

        let file = {
            let mut state = self.shared.lock();
            let record = state
                .ledger
                .get(file_name)
                .ok_or_else(|| QueueError::NotFound(file_name.to_string()))?;
            if record.state != UploadState::Pending {
                return Err(QueueError::NotPending {
                    file_name: file_name.to_string(),
                    state: record.state,
                });
            }
            let file = state
                .position(file_name)
                .map(|index| state.files[index].clone())
                .ok_or_else(|| QueueError::NotFound(file_name.to_string()))?;
            state.ledger.begin_upload(file_name)?;
            file
        };

        let (reply, response) = oneshot::channel();
        permit.send(UploadJob { file, reply });
        tracing::debug!(file_name = %file_name, "Upload job enqueued");

        match response.await {
            Ok(record) => Ok(record),
            Err(_) => Ok(self
                .shared
                .finish(file_name, Err(FALLBACK_FAILURE_MESSAGE.to_string()))),
        }
    }

    /// Submit every pending file, in queue order, one at a time.
    ///
    /// Files that stop being pending before their turn (removed, or submitted
    /// individually) are skipped and counted in neither total.
    pub async fn submit_all_pending(&self) -> BatchSummary {
        let pending: Vec<String> = {
            let state = self.shared.lock();
            state
                .files
                .iter()
                .filter(|f| {
                    state
                        .ledger
                        .get(&f.name)
                        .map(|r| r.state == UploadState::Pending)
                        .unwrap_or(false)
                })
                .map(|f| f.name.clone())
                .collect()
        };

        tracing::info!(count = pending.len(), "Submitting pending uploads");

        let mut summary = BatchSummary::default();
        for file_name in pending {
            match self.submit_one(&file_name).await {
                Ok(record) if record.state == UploadState::Success => summary.succeeded += 1,
                Ok(_) => summary.failed += 1,
                Err(e) => {
                    tracing::debug!(file_name = %file_name, error = %e, "Skipping file in batch");
                }
            }
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch upload finished"
        );
        summary
    }

    /// Queued files in insertion order, each with its record.
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        let state = self.shared.lock();
        state
            .files
            .iter()
            .filter_map(|f| {
                state.ledger.get(&f.name).map(|record| QueueEntry {
                    file_name: f.name.clone(),
                    declared_type: f.declared_type.clone(),
                    byte_size: f.byte_size,
                    record: record.clone(),
                })
            })
            .collect()
    }

    pub fn record(&self, file_name: &str) -> Option<UploadRecord> {
        self.shared.lock().ledger.get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_pending(&self) -> bool {
        let state = self.shared.lock();
        state.files.iter().any(|f| {
            state
                .ledger
                .get(&f.name)
                .map(|r| r.state == UploadState::Pending)
                .unwrap_or(false)
        })
    }

    /// Successful uploads that were assigned an invoice id, in queue order.
    pub fn successful_uploads(&self) -> Vec<UploadedInvoice> {
        self.snapshot()
            .into_iter()
            .filter(|entry| entry.record.state == UploadState::Success)
            .filter_map(|entry| {
                entry.record.invoice_id.map(|invoice_id| UploadedInvoice {
                    file_name: entry.file_name,
                    invoice_id,
                })
            })
            .collect()
    }

    /// Stream of user-facing notifications raised by the queue.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifications.subscribe()
    }

    /// Stop accepting submissions and wait for the in-flight upload, if any,
    /// and any already queued jobs to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::error!(error = %e, "Upload worker terminated abnormally");
        }
    }
}
