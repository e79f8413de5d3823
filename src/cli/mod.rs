//! CLI command implementations: the admin view over a [`MessageDb`].

pub mod backup;
pub mod messages;
pub mod settings;
pub mod stats;

use crate::config::Config;
use crate::core::{DbOptions, MessageDb, NotificationListener, TracingNotifier};
use crate::error::{Error, Result};
use crate::storage::FileBackend;
use std::sync::Arc;
use uuid::Uuid;

/// Open the file-backed store described by `config`, with notifications
/// delivered through `tracing`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created or the slots
/// cannot be initialized.
pub fn open_db(config: &Config) -> Result<MessageDb> {
    let backend = FileBackend::new(config.storage.path.clone())?;
    let mut db = MessageDb::open(backend)?.with_options(DbOptions::from(config));
    db.subscribe(Arc::new(NotificationListener::new(TracingNotifier)));
    Ok(db)
}

/// Parse a message id given on the command line.
///
/// # Errors
///
/// Returns an error if `raw` is not a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::InvalidArgument(format!("not a message id: {raw}")))
}

/// Shorten `text` to its first line, at most `max` characters.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > max {
        let cut: String = first_line.chars().take(max).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
