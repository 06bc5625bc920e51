//! File intake validation for the upload queue.

use crate::models::CandidateFile;
use serde::Serialize;

/// Maximum accepted invoice document size (50 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Media types accepted for invoice extraction: one document format and four image formats.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Extensions accepted when the platform does not report a usable media type.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "webp"];

/// Reasons a candidate file is kept out of the upload queue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported file type: {content_type} ({filename})")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },

    #[error("Duplicate file name: {0}")]
    DuplicateName(String),
}

/// Outcome of validating one candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn rejected(error: &ValidationError) -> Self {
        Self {
            accepted: false,
            reason: Some(error.to_string()),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationVerdict {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationVerdict::accepted(),
            Err(e) => ValidationVerdict::rejected(&e),
        }
    }
}

/// Invoice file validator
///
/// Admits a file when its declared media type is allowed *or* its extension is,
/// and its size does not exceed the ceiling. Zero-byte files pass.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            MAX_FILE_SIZE_BYTES,
            ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl FileValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    /// Validate file size. Only sizes above the ceiling are rejected.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.trim().to_lowercase();
        self.allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
    }

    /// Case-insensitive suffix check on the file name. A bare `.pdf` matches.
    pub fn is_allowed_extension(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    }

    /// Validate the type policy: declared media type first, extension as fallback.
    pub fn validate_type(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        if self.is_allowed_content_type(content_type) || self.is_allowed_extension(filename) {
            return Ok(());
        }

        Err(ValidationError::UnsupportedType {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        })
    }

    /// Validate all aspects of a candidate file
    pub fn check(&self, file: &CandidateFile) -> Result<(), ValidationError> {
        self.validate_type(&file.name, &file.declared_type)?;
        self.validate_file_size(file.byte_size)?;
        Ok(())
    }

    pub fn validate(&self, file: &CandidateFile) -> ValidationVerdict {
        self.check(file).into()
    }
}

/// Lowercased text after the last dot, including for dot-only names like `.pdf`.
fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Media type to declare for a local file, derived from its extension.
///
/// Used by front ends that have no platform-reported type. Unknown extensions
/// map to `application/octet-stream`.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
