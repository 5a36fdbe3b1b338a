//! Persistent player statistics: high score, answer counters, per-note results.

mod error;
mod record;
mod store;

pub use error::StatsError;
pub use record::{NoteStats, StatisticsRecord};
pub use store::{STATS_FILE, StatisticsStore};
