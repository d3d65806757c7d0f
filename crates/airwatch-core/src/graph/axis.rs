//! Axis tick label formatting

use heapless::String;

use super::constants::{MAX_AXIS_LABEL_LENGTH, THOUSANDS_THRESHOLD};

/// Format a value-axis tick
///
/// Values of 1000 and above are abbreviated to whole thousands with a "k"
/// suffix (1850 -> "1k"); everything else is printed as-is. Uses a
/// fixed-capacity heapless String so rendering never touches the heap.
pub fn format_tick(value: i16) -> String<MAX_AXIS_LABEL_LENGTH> {
    let mut s = String::new();

    if value >= THOUSANDS_THRESHOLD {
        let _ = core::fmt::write(&mut s, format_args!("{}k", value / 1000));
    } else {
        let _ = core::fmt::write(&mut s, format_args!("{}", value));
    }

    s
}
