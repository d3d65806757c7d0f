//! Summary statistics over a window of history samples

/// Min/max/mean of a sample window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    pub min: i16,
    pub max: i16,
    /// Integer mean, truncated toward zero
    pub avg: i16,
    pub count: usize,
}

impl WindowStats {
    /// Summarise a window, `None` when it is empty
    pub fn from_samples(samples: &[i16]) -> Option<Self> {
        Self::from_values(samples.iter().copied())
    }

    /// Summarise any sample sequence, `None` when it is empty
    pub fn from_values<I: IntoIterator<Item = i16>>(samples: I) -> Option<Self> {
        let mut sum = 0i64;
        let mut min = i16::MAX;
        let mut max = i16::MIN;
        let mut count = 0usize;

        for value in samples {
            sum += value as i64;
            min = min.min(value);
            max = max.max(value);
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            min,
            max,
            avg: (sum / count as i64) as i16,
            count,
        })
    }

    /// Spread between the extremes
    pub fn range(&self) -> i32 {
        self.max as i32 - self.min as i32
    }
}

/// Share of samples strictly above `baseline`, in whole percent
///
/// An empty window yields 0.
pub fn percent_above(samples: &[i16], baseline: i16) -> u8 {
    if samples.is_empty() {
        return 0;
    }

    let above = samples.iter().filter(|&&v| v > baseline).count();
    (above * 100 / samples.len()) as u8
}
