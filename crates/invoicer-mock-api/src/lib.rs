//! Invoicer Mock API Library
//!
//! An in-memory stand-in for the invoice extraction service, seeded with
//! fixture invoices. Used for local development of the CLI and in tests.

pub mod error;
pub mod fixtures;
mod handlers;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use state::MockApiState;
