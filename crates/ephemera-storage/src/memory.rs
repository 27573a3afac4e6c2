use crate::durable::DurableStore;
use crate::error::Result;
use dashmap::DashMap;

/// In-memory durable store backed by a `DashMap`.
///
/// Nothing survives the process; it stands in for the real store in tests
/// and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    storage: DashMap<String, String>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl DurableStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|value| value.clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read() {
        let store = InMemoryStore::new();

        store.write("k", "v1").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v1"));

        store.write("k", "v2").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn read_missing() {
        let store = InMemoryStore::new();
        assert_eq!(store.read("nope").unwrap(), None);
    }

    #[test]
    fn remove_missing_is_ok() {
        let store = InMemoryStore::with_capacity(4);
        store.remove("nope").unwrap();

        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }
}
