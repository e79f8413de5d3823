//! `folio export|import|reset` command implementations.

use crate::core::MessageDb;
use crate::core::backup::backup_file_name;
use crate::core::clock::day_key;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the export command.
///
/// Writes a pretty-printed snapshot to `output`, or to
/// `folio-backup-YYYY-MM-DD.json` in the current directory.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the file cannot be written.
pub fn export(db: &MessageDb, output: Option<&Path>) -> Result<()> {
    let path = output.map_or_else(
        || PathBuf::from(backup_file_name(day_key(db.now()))),
        Path::to_path_buf,
    );
    let snapshot = db.backup().export_snapshot()?;
    fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;

    println!(
        "Exported {} message(s) and {} visit day(s) to {}",
        snapshot.messages.len(),
        snapshot.visitors.len(),
        path.display()
    );
    Ok(())
}

/// Run the import command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are rejected.
pub fn import(db: &MessageDb, input: &Path) -> Result<()> {
    let text = fs::read_to_string(input)?;
    let outcome = db.backup().import_snapshot(text);
    if !outcome.success {
        return Err(Error::MalformedInput(outcome.message));
    }
    println!("{}", outcome.message);
    Ok(())
}

/// Run the reset command. Refuses to run without `confirmed`.
///
/// # Errors
///
/// Returns an error if not confirmed or storage fails.
pub fn reset(db: &MessageDb, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(Error::InvalidArgument(
            "reset deletes all messages, visits and settings; pass --yes to confirm".to_string(),
        ));
    }
    db.backup().reset_all()?;
    println!("All data reset to defaults.");
    Ok(())
}
