//! In-memory sample history
//!
//! Nothing here survives a power cycle. Histories live in fixed inline
//! arrays so the memory cost is known at build time.

pub mod history;
pub mod stats;
pub mod telemetry;

pub use history::{HistoryBuffer, MAX_CAPACITY};
pub use stats::{WindowStats, percent_above};
pub use telemetry::{Co2Trend, Metric, Telemetry};
