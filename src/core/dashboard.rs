//! Summary statistics for the admin dashboard.
//!
//! The two rates are presentation heuristics:
//!
//! - `responseRate`: 100 with no messages, else `min(100, round(100 * read / total))`.
//! - `engagementRate`: 0.0 with no visits, else `min(100, 100 * messages / visits)`
//!   rounded to one decimal.

use crate::core::clock::day_key;
use crate::core::db::MessageDb;
use crate::core::messages::{Message, most_recent};
use crate::core::visitors::{VisitLedger, VisitorStats, round_tenth};
use crate::error::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Number of stored messages.
    pub total_messages: usize,

    /// Number of unread messages.
    pub unread_messages: usize,

    /// Most recent messages, newest first.
    pub recent_messages: Vec<Message>,

    /// Messages created within the trailing window.
    pub messages_in_window: usize,

    /// Day key to message count, for the trailing window.
    pub messages_by_day: BTreeMap<NaiveDate, usize>,

    /// Visitor statistics.
    pub visitors: VisitorStats,

    /// Read share of messages, integer percent.
    pub response_rate: u32,

    /// Messages per visit, percent with one decimal.
    pub engagement_rate: f64,
}

/// Read share of messages as an integer percent.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)] // Result is clamped to 0..=100
pub fn response_rate(read: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let rate = (read as f64 / total as f64 * 100.0).min(100.0);
    rate.round() as u32
}

/// Messages per visit as a percent with one decimal.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Counts stay far below 2^52
pub fn engagement_rate(messages: usize, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    round_tenth((messages as f64 / visits as f64 * 100.0).min(100.0))
}

/// Build a summary from already-loaded state.
#[must_use]
pub fn summarize(
    messages: &[Message],
    ledger: &VisitLedger,
    now: DateTime<Utc>,
    recent_limit: usize,
    window_days: u32,
) -> DashboardSummary {
    let window_start = Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let in_window: Vec<&Message> = messages
        .iter()
        .filter(|m| m.created_at > window_start)
        .collect();

    let mut messages_by_day = BTreeMap::new();
    for message in &in_window {
        *messages_by_day.entry(day_key(message.created_at)).or_insert(0) += 1;
    }

    let read = messages.iter().filter(|m| m.read).count();
    let visitors = ledger.stats(day_key(now));

    DashboardSummary {
        total_messages: messages.len(),
        unread_messages: messages.len() - read,
        recent_messages: most_recent(messages, recent_limit),
        messages_in_window: in_window.len(),
        messages_by_day,
        response_rate: response_rate(read, messages.len()),
        engagement_rate: engagement_rate(messages.len(), visitors.total),
        visitors,
    }
}

/// Read-only aggregate view of a [`MessageDb`].
#[derive(Clone, Copy)]
pub struct Dashboard<'a> {
    db: &'a MessageDb,
}

impl<'a> Dashboard<'a> {
    pub(crate) fn new(db: &'a MessageDb) -> Self {
        Self { db }
    }

    /// Current dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the message or visitor slot cannot be read.
    pub fn summary(&self) -> Result<DashboardSummary> {
        let messages = self.db.messages().list()?;
        let ledger = self.db.visitors().ledger()?;
        let options = self.db.options();
        Ok(summarize(
            &messages,
            &ledger,
            self.db.now(),
            options.recent_limit,
            options.window_days,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)] // Exact float comparisons are safe for these test values
mod tests {
    use super::*;
    use crate::core::messages::MessageInput;
    use crate::core::visitors::RETENTION_DAYS;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn message_at(created_at: DateTime<Utc>, read: bool) -> Message {
        let mut message = Message::from_input(MessageInput::default(), created_at, None);
        message.read = read;
        message
    }

    fn ledger_with(visits: u32) -> VisitLedger {
        let mut ledger = VisitLedger::default();
        for _ in 0..visits {
            ledger.record(now(), None, "agent", RETENTION_DAYS);
        }
        ledger
    }

    #[test]
    fn oversized_window_counts_everything() {
        let messages = vec![
            message_at(now() - Duration::days(4000), false),
            message_at(now(), false),
        ];

        let summary = summarize(&messages, &ledger_with(0), now(), 5, 100_000_000);
        assert_eq!(summary.messages_in_window, 2);

        let summary = summarize(&messages, &ledger_with(0), now(), 5, u32::MAX);
        assert_eq!(summary.messages_in_window, 2);
    }

    #[test]
    fn response_rate_formula() {
        assert_eq!(response_rate(0, 0), 100);
        assert_eq!(response_rate(0, 4), 0);
        assert_eq!(response_rate(1, 3), 33);
        assert_eq!(response_rate(2, 3), 67);
        assert_eq!(response_rate(3, 3), 100);
    }

    #[test]
    fn engagement_rate_formula() {
        assert_eq!(engagement_rate(5, 0), 0.0);
        assert_eq!(engagement_rate(1, 3), 33.3);
        assert_eq!(engagement_rate(2, 3), 66.7);
        assert_eq!(engagement_rate(10, 4), 100.0);
    }

    #[test]
    fn empty_summary() {
        let summary = summarize(&[], &VisitLedger::default(), now(), 5, 7);
        assert_eq!(summary.total_messages, 0);
        assert_eq!(summary.unread_messages, 0);
        assert!(summary.recent_messages.is_empty());
        assert_eq!(summary.messages_in_window, 0);
        assert!(summary.messages_by_day.is_empty());
        assert_eq!(summary.response_rate, 100);
        assert_eq!(summary.engagement_rate, 0.0);
        assert_eq!(summary.visitors.total, 0);
    }

    #[test]
    fn window_excludes_old_messages() {
        let messages = vec![
            message_at(now() - Duration::days(10), true),
            message_at(now() - Duration::days(7), false),
            message_at(now() - Duration::days(2), false),
            message_at(now() - Duration::hours(1), true),
            message_at(now() - Duration::hours(2), false),
        ];

        let summary = summarize(&messages, &ledger_with(10), now(), 5, 7);

        assert_eq!(summary.total_messages, 5);
        assert_eq!(summary.unread_messages, 3);
        // Exactly seven days old is outside the window.
        assert_eq!(summary.messages_in_window, 3);
        assert_eq!(summary.messages_by_day.values().sum::<usize>(), 3);
        assert_eq!(
            summary.messages_by_day.get(&day_key(now() - Duration::days(2))),
            Some(&1)
        );
        assert_eq!(summary.response_rate, 40);
        assert_eq!(summary.engagement_rate, 50.0);
    }

    #[test]
    fn recent_messages_respect_limit() {
        let messages: Vec<Message> = (0..8)
            .map(|i| message_at(now() - Duration::minutes(i), false))
            .collect();

        let summary = summarize(&messages, &VisitLedger::default(), now(), 5, 7);
        assert_eq!(summary.recent_messages.len(), 5);
        assert_eq!(summary.recent_messages[0].id, messages[7].id);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let summary = summarize(&[], &VisitLedger::default(), now(), 5, 7);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["responseRate"], 100);
        assert_eq!(json["visitors"]["dailyAverage"], 0.0);
        assert!(json["messagesByDay"].is_object());
    }
}
