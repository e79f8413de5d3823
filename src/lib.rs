//! folio - local data store behind a portfolio site.
//!
//! Keeps contact messages, per-day visitor counts and user settings in three
//! JSON slots, and derives dashboard statistics and backups from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use config::Config;
pub use core::MessageDb;
pub use error::{Error, Result};
