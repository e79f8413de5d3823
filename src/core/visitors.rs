//! Visitor ledger: one aggregate per calendar day, bounded retention.
//!
//! Totals are computed over the retained days only. Once a day is evicted
//! its visits no longer count, so "total visits" is a rolling-window sum
//! rather than a lifetime counter.

use crate::core::clock::day_key;
use crate::core::db::MessageDb;
use crate::core::events::{StoreEvent, UNKNOWN_ADDRESS};
use crate::error::Result;
use crate::storage::{Slot, load_slot, save_slot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default number of days the ledger keeps.
pub const RETENTION_DAYS: usize = 30;

/// All visits recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDay {
    /// Day key (local calendar date).
    pub date: NaiveDate,

    /// Number of visits, at least 1.
    pub count: u32,

    /// Every visit instant, oldest first.
    pub visit_timestamps: Vec<DateTime<Utc>>,

    /// First visit of the day.
    pub first_visit: DateTime<Utc>,

    /// Latest visit of the day.
    pub last_visit: DateTime<Utc>,

    /// Origin address of the first visit.
    pub origin_address: String,

    /// Client agent of the first visit.
    pub client_agent: String,
}

/// Derived visitor statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    /// Visits across retained days.
    pub total: u64,

    /// Visits today.
    pub today: u32,

    /// `total / total_days`, rounded to one decimal; 0.0 for an empty ledger.
    pub daily_average: f64,

    /// Day with the highest count; the earliest such day on ties.
    pub most_active_day: Option<VisitDay>,

    /// Number of retained days.
    pub total_days: usize,
}

/// Ordered day aggregates, oldest first, at most one per day key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitLedger {
    days: Vec<VisitDay>,
}

impl From<Vec<VisitDay>> for VisitLedger {
    fn from(days: Vec<VisitDay>) -> Self {
        Self { days }
    }
}

impl VisitLedger {
    /// Retained days, oldest first.
    #[must_use]
    pub fn days(&self) -> &[VisitDay] {
        &self.days
    }

    /// Record a visit at `at`. A new day gets `origin_address` and
    /// `client_agent`; an existing one only has its count and timestamps
    /// updated. Returns the affected day.
    pub fn record(
        &mut self,
        at: DateTime<Utc>,
        origin_address: Option<String>,
        client_agent: &str,
        retention: usize,
    ) -> VisitDay {
        let key = day_key(at);
        let day = if let Some(index) = self.days.iter().position(|d| d.date == key) {
            let day = &mut self.days[index];
            day.count = day.count.saturating_add(1);
            day.last_visit = at;
            day.visit_timestamps.push(at);
            day.clone()
        } else {
            let day = VisitDay {
                date: key,
                count: 1,
                visit_timestamps: vec![at],
                first_visit: at,
                last_visit: at,
                origin_address: origin_address.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
                client_agent: client_agent.to_string(),
            };
            self.days.push(day.clone());
            day
        };
        self.retain_recent(retention);
        day
    }

    /// Drop the oldest entries until at most `retention` remain. The
    /// newest day is always kept.
    pub fn retain_recent(&mut self, retention: usize) {
        let excess = self.days.len().saturating_sub(retention.max(1));
        self.days.drain(..excess);
    }

    /// Visits across retained days.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }

    /// Visits on `date`, or 0.
    #[must_use]
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.days
            .iter()
            .find(|d| d.date == date)
            .map_or(0, |d| d.count)
    }

    /// Statistics as seen on `today`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Visit counts stay far below 2^52
    pub fn stats(&self, today: NaiveDate) -> VisitorStats {
        let total = self.total();
        let total_days = self.days.len();
        let daily_average = if total_days == 0 {
            0.0
        } else {
            round_tenth(total as f64 / total_days as f64)
        };

        let mut most_active_day: Option<&VisitDay> = None;
        for day in &self.days {
            if most_active_day.is_none_or(|best| day.count > best.count) {
                most_active_day = Some(day);
            }
        }

        VisitorStats {
            total,
            today: self.count_on(today),
            daily_average,
            most_active_day: most_active_day.cloned(),
            total_days,
        }
    }
}

/// Round to one decimal place.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Visitor slot of a [`MessageDb`].
#[derive(Clone, Copy)]
pub struct Visitors<'a> {
    db: &'a MessageDb,
}

impl<'a> Visitors<'a> {
    pub(crate) fn new(db: &'a MessageDb) -> Self {
        Self { db }
    }

    /// The stored ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor slot cannot be read.
    pub fn ledger(&self) -> Result<VisitLedger> {
        Ok(load_slot(self.db.store(), Slot::Visitors)?.unwrap_or_default())
    }

    /// Record a visit happening now and return the affected day.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor slot cannot be accessed.
    pub fn record_visit(&self) -> Result<VisitDay> {
        let mut ledger = self.ledger()?;
        let options = self.db.options();
        let day = ledger.record(
            self.db.now(),
            self.db.resolve_address(),
            &options.client_agent,
            options.retention_days,
        );

        save_slot(self.db.store(), Slot::Visitors, &ledger)?;
        tracing::debug!(date = %day.date, count = day.count, "visit recorded");

        self.db.emit(&StoreEvent::VisitRecorded { day: &day });
        Ok(day)
    }

    /// Visits across retained days (a rolling-window total).
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor slot cannot be read.
    pub fn total_visits(&self) -> Result<u64> {
        Ok(self.ledger()?.total())
    }

    /// Visits recorded today.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor slot cannot be read.
    pub fn today_visits(&self) -> Result<u32> {
        Ok(self.ledger()?.count_on(day_key(self.db.now())))
    }

    /// Aggregate visitor statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor slot cannot be read.
    pub fn stats(&self) -> Result<VisitorStats> {
        Ok(self.ledger()?.stats(day_key(self.db.now())))
    }
}
