//! File-based storage backend.

use crate::error::Result;
use crate::storage::traits::{Slot, SlotStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-based storage backend: one JSON file per slot, atomic writes.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend rooted at `base_dir`.
    ///
    /// Creates the slots directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the slots directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("slots"))?;
        Ok(Self { base_dir })
    }

    /// Root directory of this backend.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: Slot) -> PathBuf {
        self.base_dir
            .join("slots")
            .join(format!("{}.json", slot.key()))
    }
}

impl SlotStore for FileBackend {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slot: Slot, json: &str) -> Result<()> {
        let path = self.slot_path(slot);
        let temp = path.with_extension("tmp");

        fs::write(&temp, json)?;
        // Rename is atomic, readers see either the old or the new contents.
        fs::rename(&temp, &path)?;

        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<()> {
        match fs::remove_file(self.slot_path(slot)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
