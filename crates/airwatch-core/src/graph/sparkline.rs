//! Sparkline conditioner
//!
//! Turns an arbitrary-length sample window into exactly `width` pixel rows
//! in `0..height`:
//!
//! 1. trim samples outside the 1st..99th percentile
//! 2. 3-point median filter
//! 3. rescale into `0..=height-1` (flat input maps to the midpoint)
//! 4. integer linear interpolation to `width` points
//!
//! Every step is integer-only, so overlapping windows render without
//! frame-to-frame jitter.

use alloc::vec;
use alloc::vec::Vec;

use super::constants::{TRIM_HIGH_PERCENTILE, TRIM_LOW_PERCENTILE};
use crate::config::SparklineConfig;

/// Fixed-resolution sparkline conditioner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sparkline {
    width: usize,
    height: i16,
}

impl Sparkline {
    /// Create a conditioner producing `width` points in `0..height`
    ///
    /// Both dimensions are raised to at least 1.
    pub fn new(width: usize, height: i16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn from_config(config: &SparklineConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    /// Row used for empty and flat input
    pub fn midpoint(&self) -> i16 {
        (self.height - 1) / 2
    }

    /// Condition `samples` into exactly [`width`](Self::width) points
    ///
    /// Never fails: empty or constant input yields the midpoint in every
    /// slot.
    pub fn process(&self, samples: &[i16]) -> Vec<i16> {
        if samples.is_empty() {
            return vec![self.midpoint(); self.width];
        }

        let trimmed = trim_outliers(samples);
        let smoothed = median_filter(&trimmed);

        match normalize(&smoothed, self.height) {
            Some(normalized) => resample(&normalized, self.width),
            None => vec![self.midpoint(); self.width],
        }
    }
}

impl Default for Sparkline {
    fn default() -> Self {
        Self::from_config(&SparklineConfig::default())
    }
}

/// Value at percentile `p` (0-100) of an ascending slice
fn percentile(sorted: &[i16], p: usize) -> i16 {
    sorted[p * (sorted.len() - 1) / 100]
}

/// Keep samples inside the 1st..99th percentile band, in original order
///
/// Falls back to the untrimmed input if nothing survives.
fn trim_outliers(samples: &[i16]) -> Vec<i16> {
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let low = percentile(&sorted, TRIM_LOW_PERCENTILE);
    let high = percentile(&sorted, TRIM_HIGH_PERCENTILE);

    let trimmed: Vec<i16> = samples
        .iter()
        .copied()
        .filter(|v| (low..=high).contains(v))
        .collect();

    if trimmed.is_empty() {
        samples.to_vec()
    } else {
        trimmed
    }
}

fn median3(a: i16, b: i16, c: i16) -> i16 {
    a.max(b).min(a.min(b).max(c))
}

/// 3-point median; edges reuse the nearest available sample
fn median_filter(values: &[i16]) -> Vec<i16> {
    let n = values.len();
    if n < 2 {
        return values.to_vec();
    }

    (0..n)
        .map(|i| {
            let prev = values[i.saturating_sub(1)];
            let next = values[(i + 1).min(n - 1)];
            median3(prev, values[i], next)
        })
        .collect()
}

/// Rescale into `0..=height-1`, `None` for a flat sequence
fn normalize(values: &[i16], height: i16) -> Option<Vec<i16>> {
    let min = *values.iter().min()? as i64;
    let max = *values.iter().max()? as i64;
    if min == max {
        return None;
    }

    let span = max - min;
    let top = (height - 1) as i64;

    Some(
        values
            .iter()
            .map(|&v| ((v as i64 - min) * top / span) as i16)
            .collect(),
    )
}

/// Integer linear interpolation of `values` onto `width` evenly spaced points
///
/// The first and last outputs equal the first and last inputs.
fn resample(values: &[i16], width: usize) -> Vec<i16> {
    let len = values.len();
    match (len, width) {
        (0, _) => return vec![0; width],
        (1, _) => return vec![values[0]; width],
        (_, 1) => return vec![values[len - 1]],
        _ => {}
    }

    let denom = (width - 1) as i64;
    (0..width)
        .map(|i| {
            let pos = (i * (len - 1)) as i64;
            let idx = (pos / denom) as usize;
            let rem = pos % denom;

            let v0 = values[idx] as i64;
            let v1 = values[(idx + 1).min(len - 1)] as i64;
            ((v0 * (denom - rem) + v1 * rem) / denom) as i16
        })
        .collect()
}
