//! Human-friendly timestamps for the admin listing.

use chrono::{DateTime, Local, Utc};

/// Describe `at` relative to `now`.
///
/// Less than a day apart gives "Today HH:MM", one day "Yesterday HH:MM",
/// under a week "N days ago", anything older the local date.
#[must_use]
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let local = at.with_timezone(&Local);
    match (now - at).num_days().abs() {
        0 => format!("Today {}", local.format("%H:%M")),
        1 => format!("Yesterday {}", local.format("%H:%M")),
        days @ 2..=6 => format!("{days} days ago"),
        _ => local.format("%Y-%m-%d").to_string(),
    }
}
