use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error as ThisError;

///
/// SlotError
///

#[derive(Debug, ThisError)]
pub enum SlotError {
    #[error("storage quota exceeded: {len} bytes (quota {quota})")]
    QuotaExceeded { len: usize, quota: usize },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
}

///
/// StorageSlot
///
/// Durable key-value slot holding serialized text under fixed keys.
///

pub trait StorageSlot: Send {
    /// Read the value under `key`; `None` when nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError>;

    fn remove(&mut self, key: &str) -> Result<(), SlotError>;
}

///
/// MemorySlot
///
/// Process-local slot. Clones share the same contents, so a test can keep a
/// handle and inspect what the store persisted. An optional byte quota makes
/// oversized writes fail the way a full browser storage area does.
///

#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Put raw text under a key, bypassing the quota.
    pub fn seed(&self, key: &str, value: impl Into<String>) {
        self.entries.lock().insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(SlotError::QuotaExceeded {
                len: value.len(),
                quota,
            });
        }
        self.entries.lock().insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SlotError> {
        self.entries.lock().remove(key);

        Ok(())
    }
}

///
/// FileSlot
///
/// One `<key>.json` file per key inside a directory.
/// Writes go to a temp file first and are renamed into place.
///

#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, SlotError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(SlotError::Unavailable(format!("invalid slot key '{key}'")));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.path(key)?;
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));

        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SlotError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slot_clones_share_contents() {
        let handle = MemorySlot::new();
        let mut slot = handle.clone();
        slot.write("erp_data", "{}").unwrap();

        assert_eq!(handle.get("erp_data").as_deref(), Some("{}"));
        slot.remove("erp_data").unwrap();
        assert_eq!(handle.read("erp_data").unwrap(), None);
    }

    #[test]
    fn memory_slot_enforces_quota() {
        let mut slot = MemorySlot::with_quota(4);
        let err = slot.write("k", "too long").unwrap_err();

        assert!(matches!(err, SlotError::QuotaExceeded { len: 8, quota: 4 }));
        assert_eq!(slot.get("k"), None);
    }

    #[test]
    fn file_slot_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path().join("nested"));

        assert_eq!(slot.read("erp_data").unwrap(), None);
        slot.write("erp_data", r#"{"buyers":[]}"#).unwrap();
        assert_eq!(slot.read("erp_data").unwrap().as_deref(), Some(r#"{"buyers":[]}"#));
        assert!(!dir.path().join("nested/erp_data.json.tmp").exists());

        slot.remove("erp_data").unwrap();
        slot.remove("erp_data").unwrap();
        assert_eq!(slot.read("erp_data").unwrap(), None);
    }

    #[test]
    fn file_slot_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path());

        assert!(matches!(slot.read("../escape"), Err(SlotError::Unavailable(_))));
    }
}
