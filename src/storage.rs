//! Durable key-value slots.
//!
//! The cart and the pending selection are mirrored to named slots after
//! every mutation. Slot names are part of the persistence contract, not an
//! implementation detail. Implementations must never panic: a slot that
//! cannot be read or written degrades to "absent" and is logged.

use std::{
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::warn;

/// Slot holding the serialized cart collection.
pub const CART_SLOT: &str = "cart";

/// Slot holding the serialized pending selection, when one exists.
pub const PENDING_SLOT: &str = "pendingCartItem";

/// A durable string-valued slot store.
#[automock]
pub trait StateStore: Send + Sync {
    /// Read a slot. `None` when absent or unreadable.
    fn get(&self, slot: &str) -> Option<String>;

    /// Write a slot, replacing any previous value.
    fn set(&self, slot: &str, value: &str);

    /// Delete a slot. Deleting an absent slot is a no-op.
    fn remove(&self, slot: &str);
}

/// In-memory store, scoped to the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slots: Mutex<FxHashMap<String, String>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, slot: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slot)
            .cloned()
    }

    fn set(&self, slot: &str, value: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot.to_owned(), value.to_owned());
    }

    fn remove(&self, slot: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(slot);
    }
}

/// File-backed store: one JSON file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, io::Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, slot: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(slot)).ok()
    }

    fn set(&self, slot: &str, value: &str) {
        if let Err(error) = fs::write(self.slot_path(slot), value) {
            warn!(slot, %error, "failed to persist slot");
        }
    }

    fn remove(&self, slot: &str) {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(slot, %error, "failed to remove slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_store_round_trips_a_slot() {
        let store = MemoryStateStore::new();

        store.set(CART_SLOT, "[]");

        assert_eq!(store.get(CART_SLOT).as_deref(), Some("[]"));
    }

    #[test]
    fn memory_store_remove_clears_the_slot() {
        let store = MemoryStateStore::new();

        store.set(PENDING_SLOT, "{}");
        store.remove(PENDING_SLOT);

        assert_eq!(store.get(PENDING_SLOT), None);
    }

    #[test]
    fn memory_store_missing_slot_is_none() {
        let store = MemoryStateStore::new();

        assert_eq!(store.get("unknown"), None);
    }

    #[test]
    fn file_store_round_trips_a_slot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStateStore::new(dir.path())?;

        store.set(CART_SLOT, r#"[{"id":1}]"#);

        assert_eq!(store.get(CART_SLOT).as_deref(), Some(r#"[{"id":1}]"#));

        store.remove(CART_SLOT);

        assert_eq!(store.get(CART_SLOT), None);

        Ok(())
    }

    #[test]
    fn file_store_remove_of_absent_slot_is_a_noop() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStateStore::new(dir.path())?;

        store.remove(PENDING_SLOT);

        Ok(())
    }
}
