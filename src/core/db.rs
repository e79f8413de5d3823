//! The store handle that ties slots, collaborators and options together.

use crate::config::Config;
use crate::core::backup::Backup;
use crate::core::clock::{Clock, SystemClock};
use crate::core::dashboard::Dashboard;
use crate::core::events::{AddressResolver, EventListener, SimulatedResolver, StoreEvent};
use crate::core::messages::{Message, Messages};
use crate::core::settings::{Settings, SettingsStore};
use crate::core::visitors::{VisitDay, Visitors};
use crate::error::Result;
use crate::storage::{Slot, SlotStore, save_slot};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Tunables that shape derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    /// Number of most recent visit days kept.
    pub retention_days: usize,

    /// Messages shown in the dashboard's recent list.
    pub recent_limit: usize,

    /// Trailing window for dashboard message counts, in days.
    pub window_days: u32,

    /// Client agent recorded on new visit days.
    pub client_agent: String,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DbOptions {
    fn from(config: &Config) -> Self {
        Self {
            retention_days: config.visitors.retention_days,
            recent_limit: config.dashboard.recent_limit,
            window_days: config.dashboard.window_days,
            client_agent: config.visitors.client_agent.clone(),
        }
    }
}

/// Local data store for messages, visits and settings.
///
/// Construct one per process and pass it to whatever renders pages; state
/// lives in the backing [`SlotStore`], not in this handle. Each operation is
/// a load, mutate, save round trip on one slot, so two handles over the same
/// storage are last-writer-wins.
pub struct MessageDb {
    store: Box<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    resolver: Box<dyn AddressResolver>,
    listeners: Vec<Arc<dyn EventListener>>,
    options: DbOptions,
}

impl MessageDb {
    /// Open a store, initializing any slot that is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or written.
    pub fn open(store: impl SlotStore + 'static) -> Result<Self> {
        let db = Self {
            store: Box::new(store),
            clock: Arc::new(SystemClock),
            resolver: Box::new(SimulatedResolver),
            listeners: Vec::new(),
            options: DbOptions::default(),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the origin-address resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl AddressResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: DbOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a listener for store events.
    pub fn subscribe(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// The backing storage.
    #[must_use]
    pub fn store(&self) -> &dyn SlotStore {
        self.store.as_ref()
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &DbOptions {
        &self.options
    }

    /// Current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Message repository.
    #[must_use]
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    /// Visitor ledger.
    #[must_use]
    pub fn visitors(&self) -> Visitors<'_> {
        Visitors::new(self)
    }

    /// Settings store.
    #[must_use]
    pub fn settings(&self) -> SettingsStore<'_> {
        SettingsStore::new(self)
    }

    /// Dashboard aggregates.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(self)
    }

    /// Snapshot export, import and reset.
    #[must_use]
    pub fn backup(&self) -> Backup<'_> {
        Backup::new(self)
    }

    pub(crate) fn resolve_address(&self) -> Option<String> {
        self.resolver.resolve()
    }

    pub(crate) fn emit(&self, event: &StoreEvent<'_>) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    /// Write defaults into every absent slot.
    pub(crate) fn initialize(&self) -> Result<()> {
        for slot in Slot::ALL {
            if self.store.read(slot)?.is_some() {
                continue;
            }
            match slot {
                Slot::Messages => save_slot(self.store(), slot, &Vec::<Message>::new())?,
                Slot::Visitors => save_slot(self.store(), slot, &Vec::<VisitDay>::new())?,
                Slot::Settings => save_slot(self.store(), slot, &Settings::default())?,
            }
            tracing::debug!(slot = slot.key(), "slot initialized");
        }
        Ok(())
    }
}
