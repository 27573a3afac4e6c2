use crate::durable::DurableStore;
use crate::error::{PersistenceReadError, PersistenceWriteError};
use ephemera_core::Record;
use tracing::{debug, trace, warn};

/// Key under which the record sequence is stored.
pub const DEFAULT_KEY: &str = "shortenedUrls";

/// Mirrors the record sequence into a single key of a [`DurableStore`].
///
/// Every save is a full replace of that key; there is no versioning and no
/// incremental patching. The bridge keeps no copy of the records.
#[derive(Debug, Clone)]
pub struct PersistenceBridge<S> {
    store: S,
    key: String,
}

impl<S: DurableStore> PersistenceBridge<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the persisted sequence. An absent key is an empty sequence.
    pub fn try_load(&self) -> Result<Vec<Record>, PersistenceReadError> {
        let raw = self
            .store
            .read(&self.key)
            .map_err(|source| PersistenceReadError::Storage {
                key: self.key.clone(),
                source,
            })?;

        let Some(raw) = raw else {
            trace!(key = %self.key, "nothing persisted yet");
            return Ok(Vec::new());
        };

        let records: Vec<Record> =
            serde_json::from_str(&raw).map_err(|e| PersistenceReadError::Corrupt {
                key: self.key.clone(),
                message: e.to_string(),
            })?;
        debug!(key = %self.key, count = records.len(), "loaded persisted records");
        Ok(records)
    }

    /// Like [`try_load`](Self::try_load), but unreadable or corrupt content
    /// is logged and treated as an empty store.
    pub fn load(&self) -> Vec<Record> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to load persisted records; starting empty");
                Vec::new()
            }
        }
    }

    /// Serialises `records` and overwrites the key.
    pub fn save(&self, records: &[Record]) -> Result<(), PersistenceWriteError> {
        let encoded =
            serde_json::to_string(records).map_err(|e| PersistenceWriteError::Encode(e.to_string()))?;
        self.store
            .write(&self.key, &encoded)
            .map_err(|source| PersistenceWriteError::Storage {
                key: self.key.clone(),
                source,
            })?;
        trace!(key = %self.key, count = records.len(), "persisted records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, StorageError};
    use crate::memory::InMemoryStore;
    use jiff::{SignedDuration, Timestamp};

    struct BrokenStore;

    impl DurableStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(StorageError::Io("disk on fire".to_string()))
        }

        fn write(&self, _key: &str, value: &str) -> Result<()> {
            Err(StorageError::QuotaExceeded {
                needed: value.len(),
                quota: 0,
            })
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn sample_records() -> Vec<Record> {
        let now = Timestamp::from_millisecond(1_700_000_000_000).unwrap();
        let first = Record::new("https://example.com/one", "https://tinyurl.com/one", now).unwrap();
        let second = Record::with_ttl(
            "https://example.com/two?x=1&y=\"quoted\"",
            "https://tinyurl.com/two",
            now + SignedDuration::from_secs(3),
            SignedDuration::from_secs(90),
        )
        .unwrap();
        vec![second, first]
    }

    #[test]
    fn load_after_save_round_trips() {
        let bridge = PersistenceBridge::new(InMemoryStore::new());
        let records = sample_records();

        bridge.save(&records).unwrap();

        assert_eq!(bridge.load(), records);
    }

    #[test]
    fn save_is_full_replace() {
        let bridge = PersistenceBridge::new(InMemoryStore::new());
        let records = sample_records();

        bridge.save(&records).unwrap();
        bridge.save(&records[..1]).unwrap();

        assert_eq!(bridge.load(), records[..1].to_vec());
    }

    #[test]
    fn absent_key_loads_empty() {
        let bridge = PersistenceBridge::new(InMemoryStore::new());
        assert!(bridge.try_load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let store = InMemoryStore::new();
        store.write(DEFAULT_KEY, "{not json at all").unwrap();
        let bridge = PersistenceBridge::new(store);

        assert!(matches!(
            bridge.try_load(),
            Err(PersistenceReadError::Corrupt { .. })
        ));
        assert!(bridge.load().is_empty());
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let store = InMemoryStore::new();
        store.write(DEFAULT_KEY, r#"{"id": 1}"#).unwrap();
        let bridge = PersistenceBridge::new(store);

        assert!(bridge.load().is_empty());
    }

    #[test]
    fn unreadable_store_loads_empty() {
        let bridge = PersistenceBridge::new(BrokenStore);

        assert!(matches!(
            bridge.try_load(),
            Err(PersistenceReadError::Storage { .. })
        ));
        assert!(bridge.load().is_empty());
    }

    #[test]
    fn write_failure_is_reported() {
        let bridge = PersistenceBridge::new(BrokenStore);

        let err = bridge.save(&sample_records()).unwrap_err();
        assert!(matches!(err, PersistenceWriteError::Storage { .. }));
    }

    #[test]
    fn custom_key_is_isolated() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let a = PersistenceBridge::with_key(store.clone(), "a");
        let b = PersistenceBridge::with_key(store.clone(), "b");

        a.save(&sample_records()).unwrap();

        assert_eq!(a.key(), "a");
        assert!(b.load().is_empty());
        assert_eq!(store.len(), 1);
    }
}
