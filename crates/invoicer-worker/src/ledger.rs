//! Upload status ledger
//!
//! One `UploadRecord` per file name. Every state change goes through the
//! methods here, which refuse transitions the state machine does not allow.

use invoicer_core::models::{UploadRecord, UploadState};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("No upload record for {0}")]
    NotFound(String),

    #[error("Cannot move {file_name} from {from} to {to}")]
    InvalidTransition {
        file_name: String,
        from: UploadState,
        to: UploadState,
    },
}

/// Confirmation text stored on a successful record.
pub fn success_message(invoice_id: Option<&str>) -> String {
    format!(
        "Invoice {} extracted successfully",
        invoice_id.unwrap_or("processed")
    )
}

#[derive(Debug, Default)]
pub struct UploadLedger {
    records: HashMap<String, UploadRecord>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&UploadRecord> {
        self.records.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a fresh `Pending` record, replacing any previous one.
    /// Returns the replaced record.
    pub fn insert_pending(&mut self, file_name: &str) -> Option<UploadRecord> {
        self.records
            .insert(file_name.to_string(), UploadRecord::pending(file_name))
    }

    pub fn remove(&mut self, file_name: &str) -> Option<UploadRecord> {
        self.records.remove(file_name)
    }

    fn transition(
        &mut self,
        file_name: &str,
        to: UploadState,
    ) -> Result<&mut UploadRecord, LedgerError> {
        let record = self
            .records
            .get_mut(file_name)
            .ok_or_else(|| LedgerError::NotFound(file_name.to_string()))?;

        if !record.state.can_transition_to(to) {
            return Err(LedgerError::InvalidTransition {
                file_name: file_name.to_string(),
                from: record.state,
                to,
            });
        }

        record.state = to;
        Ok(record)
    }

    /// `Pending -> Uploading`
    pub fn begin_upload(&mut self, file_name: &str) -> Result<&UploadRecord, LedgerError> {
        let record = self.transition(file_name, UploadState::Uploading)?;
        record.message = None;
        record.invoice_id = None;
        Ok(record)
    }

    /// `Uploading -> Success`
    pub fn complete_success(
        &mut self,
        file_name: &str,
        invoice_id: Option<String>,
    ) -> Result<&UploadRecord, LedgerError> {
        let record = self.transition(file_name, UploadState::Success)?;
        record.message = Some(success_message(invoice_id.as_deref()));
        record.invoice_id = invoice_id;
        Ok(record)
    }

    /// `Uploading -> Error`
    pub fn complete_error(
        &mut self,
        file_name: &str,
        message: impl Into<String>,
    ) -> Result<&UploadRecord, LedgerError> {
        let record = self.transition(file_name, UploadState::Error)?;
        record.message = Some(message.into());
        record.invoice_id = None;
        Ok(record)
    }
}
