//! Tunables for acquisition, history and display conditioning
//!
//! The core never loads configuration itself; wiring code builds a
//! [`MonitorConfig`] (by hand or through any serde format) and hands the
//! pieces to the components that need them.

use serde::{Deserialize, Serialize};

/// Default number of status polls before `update()` gives up
pub const DEFAULT_POLL_ATTEMPTS: u16 = 500;

/// Default delay between two status polls in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Default number of samples kept per metric
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;

/// Default minimum spacing between two stored history samples (1 minute)
pub const DEFAULT_HISTORY_GRANULARITY_MS: u64 = 60_000;

/// Default sparkline width in pixels (full width of a 128x32 panel)
pub const DEFAULT_SPARKLINE_WIDTH_PX: usize = 128;

/// Default sparkline height in pixels
pub const DEFAULT_SPARKLINE_HEIGHT_PX: i16 = 21;

/// Default line-plot area width in pixels
pub const DEFAULT_PLOT_WIDTH_PX: u32 = 128;

/// Default line-plot area height in pixels
pub const DEFAULT_PLOT_HEIGHT_PX: u32 = 32;

/// Bounded status polling used by the ENS160 driver
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Hard ceiling on status register reads per `update()`
    pub max_attempts: u16,
    /// Sleep between two status reads
    pub interval_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// History retention for each tracked metric
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Samples kept per metric, clamped to the buffer's hard maximum
    pub capacity: usize,
    /// Minimum time between two stored samples
    pub granularity_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            granularity_ms: DEFAULT_HISTORY_GRANULARITY_MS,
        }
    }
}

/// Output resolution of the sparkline conditioner
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparklineConfig {
    /// Number of output points (one per pixel column)
    pub width: usize,
    /// Pixel height; output values fall in `0..height`
    pub height: i16,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SPARKLINE_WIDTH_PX,
            height: DEFAULT_SPARKLINE_HEIGHT_PX,
        }
    }
}

/// Pixel budget of the line plot
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLOT_WIDTH_PX,
            height: DEFAULT_PLOT_HEIGHT_PX,
        }
    }
}

/// Complete monitor configuration
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll: PollConfig,
    pub history: HistoryConfig,
    pub sparkline: SparklineConfig,
    pub plot: PlotConfig,
}
