//! Inkstone Session Store
//!
//! Persists the set of open documents and the theme preference across
//! restarts as a single JSON document. Loading is best-effort: a
//! missing or corrupt file is the same as no prior session, never an
//! error the shell has to handle.

mod error;
mod record;
mod store;

pub use error::SessionError;
pub use record::{SessionRecord, SessionTab, DEFAULT_THEME};
pub use store::SessionStore;

pub type Result<T> = std::result::Result<T, SessionError>;
