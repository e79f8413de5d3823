//! Storage trait definitions.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// One named persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Contact messages, in insertion order.
    Messages,

    /// Per-day visit aggregates, oldest first.
    Visitors,

    /// Option name to value mapping.
    Settings,
}

impl Slot {
    /// Every slot, in initialization order.
    pub const ALL: [Self; 3] = [Self::Messages, Self::Visitors, Self::Settings];

    /// Storage key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Visitors => "visitors",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Synchronous key-value storage holding JSON text per slot.
pub trait SlotStore: Send + Sync {
    /// Read the raw JSON text of a slot, `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn read(&self, slot: Slot) -> Result<Option<String>>;

    /// Replace the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn write(&self, slot: Slot, json: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn remove(&self, slot: Slot) -> Result<()>;
}

/// Read and decode a slot.
///
/// # Errors
///
/// Returns an error if the storage read fails or the slot holds JSON of the
/// wrong shape.
pub fn load_slot<T: DeserializeOwned>(store: &dyn SlotStore, slot: Slot) -> Result<Option<T>> {
    match store.read(slot)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a slot.
///
/// # Errors
///
/// Returns an error if encoding or the storage write fails.
pub fn save_slot<T: Serialize + ?Sized>(store: &dyn SlotStore, slot: Slot, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.write(slot, &json)?;
    tracing::debug!(slot = slot.key(), bytes = json.len(), "slot persisted");
    Ok(())
}
