use crate::{error::InternalError, record::Record, types::RecordId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

///
/// RecordStore
///
/// Authoritative in-memory collections, keyed by collection name.
/// Absent collections read as empty. Serializes as `{ name: [record, ..] }`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordStore {
    collections: BTreeMap<String, Vec<Record>>,
}

impl RecordStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            collections: BTreeMap::new(),
        }
    }

    /// Build a store, rejecting duplicate identifiers within a collection.
    pub fn from_collections(
        collections: BTreeMap<String, Vec<Record>>,
    ) -> Result<Self, InternalError> {
        for (name, records) in &collections {
            check_unique(name, records)?;
        }

        Ok(Self { collections })
    }

    /// Borrow one collection; absent collections are empty.
    #[must_use]
    pub fn records(&self, collection: &str) -> &[Record] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Defensive copy of one collection.
    #[must_use]
    pub fn snapshot(&self, collection: &str) -> Vec<Record> {
        self.records(collection).to_vec()
    }

    #[must_use]
    pub fn find(&self, collection: &str, id: &RecordId) -> Option<&Record> {
        self.records(collection).iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn contains(&self, collection: &str, id: &RecordId) -> bool {
        self.find(collection, id).is_some()
    }

    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.records(collection).len()
    }

    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.records(collection).is_empty()
    }

    /// Append a record. The identifier must be new to the collection.
    pub fn insert(&mut self, collection: &str, record: Record) -> Result<(), InternalError> {
        if self.contains(collection, record.id()) {
            return Err(InternalError::store_invariant(format!(
                "duplicate id {} in '{collection}'",
                record.id()
            )));
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);

        Ok(())
    }

    /// Mutable access to one record.
    pub fn find_mut(&mut self, collection: &str, id: &RecordId) -> Option<&mut Record> {
        self.collections
            .get_mut(collection)?
            .iter_mut()
            .find(|r| r.id() == id)
    }

    /// Remove one record; returns it if it existed.
    pub fn remove(&mut self, collection: &str, id: &RecordId) -> Option<Record> {
        let records = self.collections.get_mut(collection)?;
        let index = records.iter().position(|r| r.id() == id)?;

        Some(records.remove(index))
    }

    /// Remove every record whose id is in `ids`, in one pass.
    /// Returns the number removed.
    pub fn remove_many(&mut self, collection: &str, ids: &[RecordId]) -> usize {
        let Some(records) = self.collections.get_mut(collection) else {
            return 0;
        };
        let targets: HashSet<&RecordId> = ids.iter().collect();
        let before = records.len();
        records.retain(|r| !targets.contains(r.id()));

        before - records.len()
    }

    /// Replace or add whole collections; untouched collections are kept.
    pub fn overlay(&mut self, other: Self) {
        self.collections.extend(other.collections);
    }
}

fn check_unique(collection: &str, records: &[Record]) -> Result<(), InternalError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id()) {
            return Err(InternalError::store_invariant(format!(
                "duplicate id {} in '{collection}'",
                record.id()
            )));
        }
    }

    Ok(())
}

///
/// TESTS
///
