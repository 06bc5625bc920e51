//! Invoicer Worker Library
//!
//! The upload queue: a ledger of per-file upload states and a controller that
//! validates incoming files and submits them one at a time through a
//! channel-fed worker task.

pub mod ledger;
pub mod queue;
pub mod uploader;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use ledger::{LedgerError, UploadLedger};
pub use queue::{
    AddFilesOutcome, BatchSummary, QueueEntry, QueueError, UploadQueue, UploadQueueConfig,
    UploadedInvoice,
};
pub use uploader::InvoiceUploader;
