//! `folio settings` command implementation.

use crate::core::MessageDb;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Run the settings command.
///
/// With no assignments, prints the current settings. Otherwise merges each
/// `KEY=VALUE` into them and prints the result.
///
/// # Errors
///
/// Returns an error if an assignment is malformed or storage fails.
pub fn run(db: &MessageDb, assignments: &[String]) -> Result<()> {
    let settings = if assignments.is_empty() {
        db.settings().get()?
    } else {
        db.settings().update(parse_assignments(assignments)?)?
    };

    for (name, value) in settings.as_map() {
        println!("{name} = {value}");
    }
    Ok(())
}

/// Parse `KEY=VALUE` pairs. Values that are valid JSON (`true`, `10`,
/// `"x"`) keep their type; anything else is stored as a string.
fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>> {
    let mut partial = Map::new();
    for assignment in assignments {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| Error::InvalidArgument(format!("expected KEY=VALUE, got {assignment}")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(format!("missing key in {assignment}")));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        partial.insert(name.to_string(), value);
    }
    Ok(partial)
}
