//! Sensor drivers and the reading types they produce

pub mod ens160;

use serde::{Deserialize, Serialize};

pub use ens160::{DriverError, Ens160};

/// Device-reported confidence in the current output
///
/// This is a read-only classification of what the ENS160 reports in bits
/// 3-2 of its status register. The driver never refuses data because of it;
/// callers decide whether a non-normal reading is shown or stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Data is usable
    Normal,
    /// Powered for less than 3 minutes; data present but unqualified
    WarmUp,
    /// Less than ~1 hour of cumulative operation; data unqualified
    InitialStartup,
    /// Internal signal-conditioning fault
    Invalid,
    /// Unrecognised code, or no status observed yet
    #[default]
    Unknown,
}

impl Validity {
    /// Map a 2-bit validity code to its classification
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::WarmUp,
            2 => Self::InitialStartup,
            3 => Self::Invalid,
            _ => Self::Unknown,
        }
    }

    /// True only for [`Validity::Normal`]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Short label suitable for a status line
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::WarmUp => "Warm-up",
            Self::InitialStartup => "Start-up",
            Self::Invalid => "Invalid output",
            Self::Unknown => "Unknown",
        }
    }
}

/// Immutable snapshot produced by the driver after a successful update
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Equivalent CO2 concentration in ppm
    pub eco2_ppm: u16,
    /// Total volatile organic compounds in ppb
    pub tvoc_ppb: u16,
    /// AQI-UBA class, 1 (excellent) to 5 (unhealthy)
    pub aqi: u8,
    /// Compensation temperature in degrees Celsius
    pub temperature_c: f32,
    /// Compensation relative humidity in percent
    pub humidity_pct: f32,
    /// Validity reported alongside this data
    pub validity: Validity,
}
