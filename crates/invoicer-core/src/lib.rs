//! Invoicer Core Library
//!
//! This crate provides the domain models, error types, configuration, file validation
//! and invoice listing helpers shared across all Invoicer components.

pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, MockServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use listing::{paginate, sort_invoices, Page, SortKey, DEFAULT_PAGE_SIZE};
pub use validation::{FileValidator, ValidationError, ValidationVerdict};
