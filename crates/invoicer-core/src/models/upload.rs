use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Where the bytes of a candidate file come from.
///
/// Path sources are read only when the upload starts, so rejected or removed
/// files are never loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Memory(Bytes),
    Path(PathBuf),
}

/// A user-selected file that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub declared_type: String,
    pub byte_size: u64,
    pub source: FileSource,
}

impl CandidateFile {
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            byte_size: data.len() as u64,
            source: FileSource::Memory(data),
        }
    }

    pub fn from_path(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        byte_size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            byte_size,
            source: FileSource::Path(path.into()),
        }
    }
}

/// Per-file upload state.
///
/// ```text
/// Pending --submit--> Uploading --ok--> Success
///                               --err-> Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Pending,
    Uploading,
    Success,
    Error,
}

impl UploadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadState::Success | UploadState::Error)
    }

    pub fn can_transition_to(self, next: UploadState) -> bool {
        matches!(
            (self, next),
            (UploadState::Pending, UploadState::Uploading)
                | (UploadState::Uploading, UploadState::Success)
                | (UploadState::Uploading, UploadState::Error)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UploadState::Pending => "pending",
            UploadState::Uploading => "uploading",
            UploadState::Success => "success",
            UploadState::Error => "error",
        }
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry for one queued file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    pub file_name: String,
    pub state: UploadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
}

impl UploadRecord {
    pub fn pending(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            state: UploadState::Pending,
            message: None,
            invoice_id: None,
        }
    }

    /// Link to the invoice detail view for a successful upload.
    pub fn invoice_link(&self) -> Option<String> {
        match (self.state, self.invoice_id.as_deref()) {
            (UploadState::Success, Some(id)) => Some(format!("/invoice/{}", id)),
            _ => None,
        }
    }
}
