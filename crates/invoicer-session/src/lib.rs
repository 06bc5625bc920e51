//! Invoicer Session Library
//!
//! Tracks whether the user has signed in. The flag lives behind the
//! `SessionPersistence` trait so the CLI can keep it in a JSON file while tests
//! keep it in memory.
//!
//! # Stored keys
//!
//! - `auth_token`: `"true"` while signed in, absent otherwise.

pub mod local;
pub mod memory;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use local::FileSessionPersistence;
pub use memory::MemorySessionPersistence;
pub use store::{Credentials, SessionStore, AUTH_KEY};
pub use traits::{SessionError, SessionPersistence, SessionResult};
