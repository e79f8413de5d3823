//! User settings: a mapping of option names to JSON values.

use crate::core::db::MessageDb;
use crate::error::Result;
use crate::storage::{Slot, load_slot, save_slot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const DEFAULT_THEME: &str = "dark";
const DEFAULT_ITEMS_PER_PAGE: u64 = 10;

/// Option name to value mapping. Unknown options are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Default for Settings {
    fn default() -> Self {
        let mut options = Map::new();
        options.insert("notifications".to_string(), json!(true));
        options.insert("autoRefresh".to_string(), json!(true));
        options.insert("theme".to_string(), json!(DEFAULT_THEME));
        options.insert("itemsPerPage".to_string(), json!(DEFAULT_ITEMS_PER_PAGE));
        Self(options)
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(options: Map<String, Value>) -> Self {
        Self(options)
    }
}

impl Settings {
    /// Raw value of an option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// All options.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow merge: every key in `partial` replaces the current value.
    pub fn merge(&mut self, partial: Map<String, Value>) {
        self.0.extend(partial);
    }

    /// Whether new messages raise a notification.
    #[must_use]
    pub fn notifications(&self) -> bool {
        self.flag("notifications")
    }

    /// Whether the admin view refreshes itself.
    #[must_use]
    pub fn auto_refresh(&self) -> bool {
        self.flag("autoRefresh")
    }

    /// UI theme name.
    #[must_use]
    pub fn theme(&self) -> &str {
        self.get("theme")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_THEME)
    }

    /// Page size for message listings.
    #[must_use]
    pub fn items_per_page(&self) -> u64 {
        self.get("itemsPerPage")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
    }

    fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(true)
    }
}

/// Settings slot of a [`MessageDb`].
#[derive(Clone, Copy)]
pub struct SettingsStore<'a> {
    db: &'a MessageDb,
}

impl<'a> SettingsStore<'a> {
    pub(crate) fn new(db: &'a MessageDb) -> Self {
        Self { db }
    }

    /// Current settings, or the defaults if none were ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings slot cannot be read.
    pub fn get(&self) -> Result<Settings> {
        Ok(load_slot(self.db.store(), Slot::Settings)?.unwrap_or_default())
    }

    /// Merge `partial` into the current settings and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings slot cannot be read or written.
    pub fn update(&self, partial: Map<String, Value>) -> Result<Settings> {
        let mut settings = self.get()?;
        settings.merge(partial);
        save_slot(self.db.store(), Slot::Settings, &settings)?;
        Ok(settings)
    }
}
