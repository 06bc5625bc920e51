//! Invoicer Infrastructure Library
//!
//! Shared infrastructure used by the Invoicer binaries:
//! - Telemetry initialization (tracing subscriber)
//! - HTTP error body
//! - Middleware (request ID), behind the `middleware` feature

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::ErrorResponse;
