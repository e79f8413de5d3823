//! Whole-store snapshots: export, import, reset.

use crate::core::db::MessageDb;
use crate::core::messages::Message;
use crate::core::settings::Settings;
use crate::core::visitors::{VisitDay, VisitLedger};
use crate::error::{Error, Result};
use crate::storage::{Slot, SlotStore, save_slot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Format version written into every snapshot.
pub const BACKUP_VERSION: &str = "1.0.0";

/// Full-store export/import payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    /// All messages.
    pub messages: Vec<Message>,

    /// Retained visitor days.
    pub visitors: Vec<VisitDay>,

    /// Settings.
    pub settings: Settings,

    /// When the snapshot was taken.
    pub export_date: DateTime<Utc>,

    /// Snapshot format version.
    pub version: String,
}

/// Suggested file name for a snapshot taken on `date`.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("folio-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Input accepted by [`Backup::import_snapshot`].
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    /// JSON text, parsed on import.
    Text(String),
    /// An already-parsed JSON value.
    Value(Value),
    /// A typed snapshot.
    Document(BackupDocument),
}

impl From<&str> for SnapshotSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SnapshotSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for SnapshotSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<BackupDocument> for SnapshotSource {
    fn from(document: BackupDocument) -> Self {
        Self::Document(document)
    }
}

/// Result of an import, reported as a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Whether anything was written.
    pub success: bool,

    /// Human-readable outcome.
    pub message: String,
}

impl ImportOutcome {
    fn imported() -> Self {
        Self {
            success: true,
            message: "Data imported successfully".to_string(),
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Slots present in an import payload. `None` means "leave untouched".
#[derive(Debug)]
struct Restore {
    messages: Option<Vec<Message>>,
    visitors: Option<Vec<VisitDay>>,
    settings: Option<Settings>,
}

impl Restore {
    fn parse(source: SnapshotSource) -> Result<Self> {
        let value = match source {
            SnapshotSource::Document(document) => {
                check_visit_days(&document.visitors)?;
                return Ok(Self {
                    messages: Some(document.messages),
                    visitors: Some(document.visitors),
                    settings: Some(document.settings),
                });
            }
            SnapshotSource::Text(text) => serde_json::from_str(&text)
                .map_err(|e| Error::MalformedInput(format!("not JSON: {e}")))?,
            SnapshotSource::Value(value) => value,
        };

        let Value::Object(mut object) = value else {
            return Err(Error::MalformedInput("expected a JSON object".to_string()));
        };

        let restore = Self {
            messages: take_field(&mut object, "messages")?,
            visitors: take_field(&mut object, "visitors")?,
            settings: take_field(&mut object, "settings")?,
        };
        if let Some(visitors) = &restore.visitors {
            check_visit_days(visitors)?;
        }
        Ok(restore)
    }
}

/// Each day key at most once, every count at least 1.
fn check_visit_days(days: &[VisitDay]) -> Result<()> {
    let mut seen = HashSet::new();
    for day in days {
        if day.count == 0 {
            return Err(Error::MalformedInput(format!(
                "visitors: {} has a zero count",
                day.date
            )));
        }
        if !seen.insert(day.date) {
            return Err(Error::MalformedInput(format!(
                "visitors: {} appears more than once",
                day.date
            )));
        }
    }
    Ok(())
}

/// Remove and decode `key`. Absent and `null` both mean "not present".
fn take_field<T: DeserializeOwned>(object: &mut Map<String, Value>, key: &str) -> Result<Option<T>> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::MalformedInput(format!("{key}: {e}"))),
    }
}

/// Snapshot operations on a [`MessageDb`].
#[derive(Clone, Copy)]
pub struct Backup<'a> {
    db: &'a MessageDb,
}

impl<'a> Backup<'a> {
    pub(crate) fn new(db: &'a MessageDb) -> Self {
        Self { db }
    }

    /// Snapshot the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if any slot cannot be read.
    pub fn export_snapshot(&self) -> Result<BackupDocument> {
        Ok(BackupDocument {
            messages: self.db.messages().list()?,
            visitors: self.db.visitors().ledger()?.days().to_vec(),
            settings: self.db.settings().get()?,
            export_date: self.db.now(),
            version: BACKUP_VERSION.to_string(),
        })
    }

    /// Overwrite each slot present in `source`; absent slots are untouched.
    ///
    /// The whole payload is validated before anything is written, so a
    /// failed import leaves the store as it was. Failures are reported in
    /// the returned outcome.
    pub fn import_snapshot(&self, source: impl Into<SnapshotSource>) -> ImportOutcome {
        match Restore::parse(source.into()).and_then(|restore| self.apply(restore)) {
            Ok(()) => ImportOutcome::imported(),
            Err(Error::MalformedInput(reason)) => {
                tracing::warn!(%reason, "import rejected");
                ImportOutcome::failed(format!("Invalid data format: {reason}"))
            }
            Err(e) => {
                tracing::warn!(error = %e, "import failed");
                ImportOutcome::failed(e.to_string())
            }
        }
    }

    fn apply(&self, restore: Restore) -> Result<()> {
        let store = self.db.store();
        if let Some(messages) = restore.messages {
            save_slot(store, Slot::Messages, &messages)?;
        }
        if let Some(visitors) = restore.visitors {
            let mut ledger = VisitLedger::from(visitors);
            ledger.retain_recent(self.db.options().retention_days);
            save_slot(store, Slot::Visitors, &ledger)?;
        }
        if let Some(settings) = restore.settings {
            save_slot(store, Slot::Settings, &settings)?;
        }
        Ok(())
    }

    /// Clear every slot and reinitialize defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any slot cannot be removed or rewritten.
    pub fn reset_all(&self) -> Result<()> {
        for slot in Slot::ALL {
            self.db.store().remove(slot)?;
        }
        self.db.initialize()?;
        tracing::debug!("store reset to defaults");
        Ok(())
    }
}
