//! Domain models shared by the client, the upload queue and the mock API.

pub mod invoice;
pub mod notification;
pub mod upload;

pub use invoice::{
    parse_invoice_date, HealthStatus, InvoiceList, InvoiceRecord, InvoiceSummary, LineItem,
    UploadResponse,
};
pub use notification::{Notification, NotificationLevel};
pub use upload::{CandidateFile, FileSource, UploadRecord, UploadState};
