//! Rolling per-metric history fed from driver readings
//!
//! [`Telemetry`] keeps one [`HistoryBuffer`] per tracked metric and stores a
//! quantised sample at most once per granularity period. It also derives the
//! trailing eCO2 average and the short-term eCO2 trend shown next to the
//! live value.

use core::array;

use log::debug;
use serde::{Deserialize, Serialize};

use super::history::{HistoryBuffer, MAX_CAPACITY};
use super::stats::WindowStats;
use crate::config::HistoryConfig;
use crate::metrics::{heat_index, round_half_away};
use crate::sensors::Reading;

/// Number of stored samples in the trailing eCO2 average
pub const AVERAGE_WINDOW: usize = 15;

/// Samples per window when comparing recent eCO2 levels
pub const TREND_WINDOW: usize = 5;

/// Difference of window means (ppm) that counts as a real change
pub const TREND_THRESHOLD_PPM: i32 = 50;

/// Metrics with a stored history
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Eco2,
    Temperature,
    Humidity,
    HeatIndex,
}

impl Metric {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Eco2,
        Self::Temperature,
        Self::Humidity,
        Self::HeatIndex,
    ];

    /// Slot of this metric in per-metric arrays
    pub const fn index(self) -> usize {
        match self {
            Self::Eco2 => 0,
            Self::Temperature => 1,
            Self::Humidity => 2,
            Self::HeatIndex => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Eco2 => "eCO2",
            Self::Temperature => "Temp",
            Self::Humidity => "Humidity",
            Self::HeatIndex => "Heat index",
        }
    }

    /// Unit suffix for display
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Eco2 => "ppm",
            Self::Temperature | Self::HeatIndex => "°C",
            Self::Humidity => "%",
        }
    }
}

/// Direction of recent eCO2 movement
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Co2Trend {
    Rising,
    Stable,
    Falling,
    /// Fewer than two full windows stored
    #[default]
    Unknown,
}

impl Co2Trend {
    /// Classify a change in mean eCO2 between two windows
    pub const fn from_difference(diff_ppm: i32) -> Self {
        if diff_ppm > TREND_THRESHOLD_PPM {
            Self::Rising
        } else if diff_ppm < -TREND_THRESHOLD_PPM {
            Self::Falling
        } else {
            Self::Stable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rising => "Rising",
            Self::Stable => "Stable",
            Self::Falling => "Falling",
            Self::Unknown => "Unknown",
        }
    }
}

/// Histories and derived values for every tracked metric
pub struct Telemetry<const MAX: usize = MAX_CAPACITY> {
    histories: [HistoryBuffer<MAX>; Metric::COUNT],
    granularity_ms: u64,
    last_stored_ms: Option<u64>,
    current: Option<Reading>,
    previous: Option<Reading>,
}

impl<const MAX: usize> Telemetry<MAX> {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            histories: array::from_fn(|_| HistoryBuffer::new(config.capacity)),
            granularity_ms: config.granularity_ms,
            last_stored_ms: None,
            current: None,
            previous: None,
        }
    }

    /// Track a new reading taken at `now_ms`
    ///
    /// Every reading becomes the current one. It is also appended to the
    /// histories when this is the first stored sample or at least one
    /// granularity period has passed since the last one. An eCO2 of 0 (no
    /// data yet) is left out of the eCO2 history only.
    ///
    /// # Returns
    /// `true` if the reading was stored in the histories
    pub fn record(&mut self, now_ms: u64, reading: &Reading) -> bool {
        let due = match self.last_stored_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.granularity_ms,
        };

        if due {
            if reading.eco2_ppm > 0 {
                self.histories[Metric::Eco2.index()].enqueue(saturate_ppm(reading.eco2_ppm));
            }
            self.histories[Metric::Temperature.index()]
                .enqueue(quantise(reading.temperature_c));
            self.histories[Metric::Humidity.index()].enqueue(quantise(reading.humidity_pct));
            self.histories[Metric::HeatIndex.index()]
                .enqueue(quantise(heat_index(reading.temperature_c, reading.humidity_pct)));

            self.last_stored_ms = Some(now_ms);
            debug!(
                "Stored sample at {} ms ({} eCO2 samples)",
                now_ms,
                self.histories[Metric::Eco2.index()].len()
            );
        }

        self.previous = self.current.replace(*reading);
        due
    }

    /// History of one metric
    pub fn history(&self, metric: Metric) -> &HistoryBuffer<MAX> {
        &self.histories[metric.index()]
    }

    /// Mutable history of one metric, e.g. for [`HistoryBuffer::contiguous`]
    pub fn history_mut(&mut self, metric: Metric) -> &mut HistoryBuffer<MAX> {
        &mut self.histories[metric.index()]
    }

    /// Most recent reading passed to [`record`](Self::record)
    pub fn current(&self) -> Option<&Reading> {
        self.current.as_ref()
    }

    /// Reading before the current one
    pub fn previous(&self) -> Option<&Reading> {
        self.previous.as_ref()
    }

    /// Timestamp of the last sample stored in the histories
    pub fn last_stored_ms(&self) -> Option<u64> {
        self.last_stored_ms
    }

    /// Mean of the most recent [`AVERAGE_WINDOW`] stored eCO2 samples
    ///
    /// Falls back to the current reading (0 without one) until enough
    /// samples exist.
    pub fn eco2_average(&self) -> u16 {
        let history = self.history(Metric::Eco2);
        let len = history.len();

        if len < AVERAGE_WINDOW {
            return self.current.map_or(0, |r| r.eco2_ppm);
        }

        WindowStats::from_values(history.iter().skip(len - AVERAGE_WINDOW))
            .map_or(0, |stats| stats.avg.max(0) as u16)
    }

    /// Compare the mean of the last [`TREND_WINDOW`] eCO2 samples with the
    /// window before it
    pub fn eco2_trend(&self) -> Co2Trend {
        let history = self.history(Metric::Eco2);
        let len = history.len();

        if len < 2 * TREND_WINDOW {
            return Co2Trend::Unknown;
        }

        let mut recent = history.iter().skip(len - 2 * TREND_WINDOW);
        let earlier = WindowStats::from_values(recent.by_ref().take(TREND_WINDOW));
        let latest = WindowStats::from_values(recent);

        match (earlier, latest) {
            (Some(earlier), Some(latest)) => {
                Co2Trend::from_difference(latest.avg as i32 - earlier.avg as i32)
            }
            _ => Co2Trend::Unknown,
        }
    }

    /// Whether the current reading differs from the previous one
    ///
    /// Always true until two readings have been recorded.
    pub fn measurements_changed(&self) -> bool {
        match (&self.current, &self.previous) {
            (Some(current), Some(previous)) => {
                current.eco2_ppm != previous.eco2_ppm
                    || current.temperature_c != previous.temperature_c
                    || current.humidity_pct != previous.humidity_pct
            }
            _ => true,
        }
    }
}

fn saturate_ppm(ppm: u16) -> i16 {
    ppm.min(i16::MAX as u16) as i16
}

fn quantise(value: f32) -> i16 {
    round_half_away(value).clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::Validity;

    const MINUTE_MS: u64 = 60_000;

    fn reading(eco2_ppm: u16, temperature_c: f32, humidity_pct: f32) -> Reading {
        Reading {
            eco2_ppm,
            tvoc_ppb: 0,
            aqi: 1,
            temperature_c,
            humidity_pct,
            validity: Validity::Normal,
        }
    }

    fn telemetry() -> Telemetry {
        Telemetry::new(&HistoryConfig::default())
    }

    fn feed(telemetry: &mut Telemetry, eco2: &[u16]) {
        for (i, &ppm) in eco2.iter().enumerate() {
            telemetry.record(i as u64 * MINUTE_MS, &reading(ppm, 22.0, 50.0));
        }
    }

    #[test]
    fn test_trend_table() {
        let cases: [(&[u16], Co2Trend); 6] = [
            (&[400, 410, 420], Co2Trend::Unknown),
            (
                &[400, 405, 395, 400, 410, 408, 402, 398, 405, 403],
                Co2Trend::Stable,
            ),
            (
                &[400, 405, 410, 415, 420, 450, 455, 460, 465, 470],
                Co2Trend::Stable,
            ),
            (
                &[400, 405, 410, 415, 420, 480, 485, 490, 495, 500],
                Co2Trend::Rising,
            ),
            (
                &[500, 495, 490, 485, 480, 420, 415, 410, 405, 400],
                Co2Trend::Falling,
            ),
            (
                &[500, 495, 490, 485, 480, 470, 465, 460, 455, 450],
                Co2Trend::Stable,
            ),
        ];

        for (samples, expected) in cases {
            let mut t = telemetry();
            feed(&mut t, samples);
            assert_eq!(t.eco2_trend(), expected, "samples {:?}", samples);
        }
    }

    #[test]
    fn test_granularity_gates_storage() {
        let mut t = telemetry();

        assert!(t.record(0, &reading(500, 21.0, 40.0)));
        assert!(!t.record(30_000, &reading(510, 21.0, 40.0)));
        assert!(t.record(MINUTE_MS, &reading(520, 21.0, 40.0)));

        assert_eq!(t.history(Metric::Eco2).len(), 2);
        assert_eq!(t.current().map(|r| r.eco2_ppm), Some(520));
        assert_eq!(t.last_stored_ms(), Some(MINUTE_MS));
    }

    #[test]
    fn test_zero_eco2_is_not_stored() {
        let mut t = telemetry();
        t.record(0, &reading(0, 21.4, 40.6));

        assert!(t.history(Metric::Eco2).is_empty());
        assert_eq!(t.history(Metric::Temperature).latest(), Some(21));
        assert_eq!(t.history(Metric::Humidity).latest(), Some(41));
        assert_eq!(t.history(Metric::HeatIndex).latest(), Some(21));
    }

    #[test]
    fn test_quantisation() {
        assert_eq!(quantise(-3.5), -4);
        assert_eq!(quantise(99.5), 100);
        assert_eq!(quantise(1.0e9), i16::MAX);
        assert_eq!(saturate_ppm(60_000), i16::MAX);
    }

    #[test]
    fn test_average_falls_back_to_current() {
        let mut t = telemetry();
        assert_eq!(t.eco2_average(), 0);

        feed(&mut t, &[400, 800]);
        assert_eq!(t.eco2_average(), 800);
    }

    #[test]
    fn test_average_uses_latest_window() {
        let mut t = telemetry();
        let samples: [u16; 20] = core::array::from_fn(|i| 400 + i as u16);
        feed(&mut t, &samples);

        // 405..=419
        assert_eq!(t.eco2_average(), 412);
    }

    #[test]
    fn test_measurements_changed() {
        let mut t = telemetry();
        assert!(t.measurements_changed());

        t.record(0, &reading(600, 22.0, 45.0));
        assert!(t.measurements_changed());

        t.record(1_000, &reading(600, 22.0, 45.0));
        assert!(!t.measurements_changed());

        t.record(2_000, &reading(600, 22.5, 45.0));
        assert!(t.measurements_changed());
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = HistoryConfig {
            capacity: 3,
            granularity_ms: 0,
        };
        let mut t: Telemetry<8> = Telemetry::new(&config);
        for ppm in [500, 510, 520, 530] {
            t.record(0, &reading(ppm, 20.0, 50.0));
        }

        assert_eq!(t.history_mut(Metric::Eco2).contiguous(), &[510, 520, 530]);
    }
}
