//! Constants for series conditioning and plot scaling

/// Lower percentile kept by the sparkline outlier trim
pub const TRIM_LOW_PERCENTILE: usize = 1;

/// Upper percentile kept by the sparkline outlier trim
pub const TRIM_HIGH_PERCENTILE: usize = 99;

/// Maximum length of a formatted axis label (characters)
///
/// Fits "-32768" with room to spare.
pub const MAX_AXIS_LABEL_LENGTH: usize = 8;

/// Values at or above this are labelled in thousands ("1k", "2k")
pub const THOUSANDS_THRESHOLD: i16 = 1000;

/// Value range used when every visible sample is equal
///
/// Prevents a division by zero and pins a flat line to the top row.
pub const MIN_VALUE_RANGE: i32 = 1;
