//! Core data model and store operations.

pub mod backup;
pub mod clock;
pub mod dashboard;
pub mod db;
pub mod events;
pub mod format;
pub mod messages;
pub mod settings;
pub mod visitors;

pub use backup::{BACKUP_VERSION, Backup, BackupDocument, ImportOutcome, SnapshotSource};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::{Dashboard, DashboardSummary};
pub use db::{DbOptions, MessageDb};
pub use events::{
    AddressResolver, EventListener, FixedResolver, NotificationListener, Notifier,
    SimulatedResolver, StoreEvent, TracingNotifier,
};
pub use messages::{Message, MessageInput, Messages};
pub use settings::{Settings, SettingsStore};
pub use visitors::{VisitDay, VisitLedger, VisitorStats, Visitors};
