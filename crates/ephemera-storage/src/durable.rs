use crate::error::Result;
use std::sync::Arc;

/// A synchronous, persistent key-value store.
///
/// Values are opaque strings; writes replace the whole value.
pub trait DurableStore: Send + Sync + 'static {
    /// Returns the value under `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. It is not an error if the key does not exist.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: DurableStore + ?Sized> DurableStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
