//! Persistence adapter: the whole record store as one JSON blob under a
//! fixed key in a durable slot.

mod slot;

pub use slot::{FileSlot, MemorySlot, SlotError, StorageSlot};

use crate::{
    db::store::RecordStore,
    error::{ErrorClass, ErrorOrigin, InternalError},
    record::Record,
    serialize::{self, SerializeError},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// PersistError
///

#[derive(Debug, ThisError)]
pub enum PersistError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error("malformed store blob: {0}")]
    Malformed(String),
}

impl From<PersistError> for InternalError {
    fn from(err: PersistError) -> Self {
        let class = match &err {
            PersistError::Slot(_) => ErrorClass::Internal,
            PersistError::Serialize(inner) if !inner.is_decode() => ErrorClass::Internal,
            PersistError::Serialize(_) | PersistError::Malformed(_) => ErrorClass::Corruption,
        };

        Self::new(class, ErrorOrigin::Persist, err.to_string())
    }
}

///
/// LoadStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadStatus {
    /// Persisted collections were overlaid on the defaults.
    Restored,

    /// Nothing was persisted; defaults only.
    Empty,

    /// The slot was unreadable or the blob malformed; defaults only.
    Rejected,
}

///
/// Persistence
///

pub struct Persistence {
    slot: Box<dyn StorageSlot>,
    key: String,
}

impl Persistence {
    #[must_use]
    pub fn new(slot: Box<dyn StorageSlot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the whole store. Returns the number of bytes written.
    pub fn save(&mut self, store: &RecordStore) -> Result<usize, PersistError> {
        let text = serialize::serialize(store)?;
        self.slot.write(&self.key, &text)?;

        Ok(text.len())
    }

    /// Read the slot and overlay any persisted collections on `defaults`.
    /// Never fails: unreadable or malformed state keeps the defaults.
    #[must_use]
    pub fn load(&self, mut defaults: RecordStore) -> (RecordStore, LoadStatus) {
        let text = match self.slot.read(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return (defaults, LoadStatus::Empty),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to read persisted store; using defaults");
                return (defaults, LoadStatus::Rejected);
            }
        };

        match decode(&text) {
            Ok(persisted) => {
                defaults.overlay(persisted);
                (defaults, LoadStatus::Restored)
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding malformed persisted store; using defaults");
                (defaults, LoadStatus::Rejected)
            }
        }
    }

    /// Drop the persisted blob.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.slot.remove(&self.key)?;

        Ok(())
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Parse a blob into a store.
///
/// The blob must be an object of arrays of records, every record must carry
/// a valid id, and ids must be unique within each collection.
pub fn decode(text: &str) -> Result<RecordStore, PersistError> {
    let collections: BTreeMap<String, Vec<Record>> = serialize::deserialize(text)?;

    RecordStore::from_collections(collections).map_err(|err| PersistError::Malformed(err.message))
}

/// Pretty-printed blob for external backup.
pub fn export(store: &RecordStore) -> Result<String, PersistError> {
    Ok(serialize::serialize_pretty(store)?)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn defaults() -> RecordStore {
        let mut store = RecordStore::new();
        store.insert("buyers", record(1, "active")).unwrap();
        store.insert("factories", record(1, "active")).unwrap();
        store
    }

    fn persistence(slot: &MemorySlot) -> Persistence {
        Persistence::new(Box::new(slot.clone()), "erp_data")
    }

    #[test]
    fn load_without_blob_keeps_defaults() {
        let slot = MemorySlot::new();
        let (store, status) = persistence(&slot).load(defaults());

        assert_eq!(status, LoadStatus::Empty);
        assert_eq!(store, defaults());
    }

    #[test]
    fn load_overlays_persisted_collections() {
        let slot = MemorySlot::new();
        slot.seed(
            "erp_data",
            r#"{"buyers":[{"id":7,"status":"inactive"},{"id":"x"}]}"#,
        );
        let (store, status) = persistence(&slot).load(defaults());

        assert_eq!(status, LoadStatus::Restored);
        assert_eq!(store.len("buyers"), 2);
        assert_eq!(store.len("factories"), 1);
    }

    #[test]
    fn malformed_blobs_are_rejected() {
        for blob in [
            "{not json",
            "[]",
            r#"{"buyers":{"id":1}}"#,
            r#"{"buyers":[{"name":"no id"}]}"#,
            r#"{"buyers":[{"id":1},{"id":1}]}"#,
        ] {
            let slot = MemorySlot::new();
            slot.seed("erp_data", blob);
            let (store, status) = persistence(&slot).load(defaults());

            assert_eq!(status, LoadStatus::Rejected, "blob {blob} should be rejected");
            assert_eq!(store, defaults());
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let slot = MemorySlot::new();
        let mut persistence = persistence(&slot);
        let mut store = defaults();
        store.insert("orders", record(3, "pending")).unwrap();

        let bytes = persistence.save(&store).unwrap();
        assert_eq!(bytes, slot.get("erp_data").unwrap().len());

        let (loaded, status) = persistence.load(RecordStore::new());
        assert_eq!(status, LoadStatus::Restored);
        assert_eq!(loaded, store);
    }

    #[test]
    fn quota_failures_surface_as_slot_errors() {
        let slot = MemorySlot::with_quota(8);
        let err = persistence(&slot).save(&defaults()).unwrap_err();

        assert!(matches!(err, PersistError::Slot(SlotError::QuotaExceeded { .. })));
        assert_eq!(InternalError::from(err).origin, ErrorOrigin::Persist);
    }

    #[test]
    fn clear_removes_the_blob() {
        let slot = MemorySlot::new();
        let mut persistence = persistence(&slot);
        persistence.save(&defaults()).unwrap();
        persistence.clear().unwrap();

        assert_eq!(slot.get("erp_data"), None);
    }

    #[test]
    fn export_is_pretty_and_decodes_back() {
        let text = export(&defaults()).unwrap();

        assert!(text.starts_with("{\n  \"buyers\": [\n"));
        assert_eq!(decode(&text).unwrap(), defaults());
    }
}
