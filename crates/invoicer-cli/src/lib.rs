//! Invoicer CLI library
//!
//! Pieces of the `invoicer` binary that are worth testing on their own:
//! the session guard, local file intake and table rendering.

pub mod files;
pub mod output;
pub mod session;

pub use output::{print_json, truncate_string};
pub use session::{open_session_store, require_session, NOT_SIGNED_IN};
