//! Durable storage for the Ephemera record store.
//!
//! A [`DurableStore`] is a synchronous key-value facility that survives
//! restarts. The [`PersistenceBridge`] mirrors the whole record sequence into
//! one key of such a store, overwriting it on every save.

pub mod bridge;
pub mod durable;
pub mod error;
pub mod file;
pub mod memory;

pub use bridge::{PersistenceBridge, DEFAULT_KEY};
pub use durable::DurableStore;
pub use error::{PersistenceReadError, PersistenceWriteError, Result, StorageError};
pub use file::FileStore;
pub use memory::InMemoryStore;
