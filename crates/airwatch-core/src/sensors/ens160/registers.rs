//! ENS160 register map, commands and status decoding

use crate::sensors::Validity;

// =============================================================================
// I2C Address
// =============================================================================

/// Default ENS160 I2C address (ADDR pin high)
pub const DEFAULT_ADDRESS: u8 = 0x53;

/// Alternate ENS160 I2C address (ADDR pin low)
pub const ALTERNATE_ADDRESS: u8 = 0x52;

/// Value of PART_ID for an ENS160
pub const PART_ID: u16 = 0x0160;

// =============================================================================
// Register Addresses
// =============================================================================

pub const ADDR_PART_ID: u8 = 0x00;
pub const ADDR_OPMODE: u8 = 0x10;
/// Interrupt pin configuration; left at its reset value
pub const ADDR_CONFIG: u8 = 0x11;
pub const ADDR_COMMAND: u8 = 0x12;
/// TEMP_IN (2 bytes) immediately followed by RH_IN (2 bytes)
pub const ADDR_TEMP_IN: u8 = 0x13;
pub const ADDR_RH_IN: u8 = 0x15;
pub const ADDR_DEVICE_STATUS: u8 = 0x20;
/// DATA_AQI (1 byte), DATA_TVOC (2 bytes), DATA_ECO2 (2 bytes)
pub const ADDR_DATA_AQI: u8 = 0x21;
pub const ADDR_DATA_TVOC: u8 = 0x22;
pub const ADDR_DATA_ECO2: u8 = 0x24;

/// Length of the AQI + TVOC + eCO2 burst
pub const DATA_BURST_LEN: usize = 5;

/// Length of the TEMP_IN + RH_IN burst
pub const COMPENSATION_BURST_LEN: usize = 4;

// =============================================================================
// Commands
// =============================================================================

pub const CMD_NOP: u8 = 0x00;
/// Load the firmware version into GPR_READ4..6 (idle mode only)
pub const CMD_GET_APPVER: u8 = 0x0E;
pub const CMD_CLR_GPR: u8 = 0xCC;

// =============================================================================
// Status Register Bits
// =============================================================================

/// An operating mode is running
pub const STATUS_STATAS: u8 = 1 << 7;
/// Fatal error detected (e.g. invalid operating mode selected)
pub const STATUS_STATER: u8 = 1 << 6;
pub const STATUS_VALIDITY_MASK: u8 = 0b0000_1100;
pub const STATUS_VALIDITY_SHIFT: u8 = 2;
/// New data in DATA_x, cleared by the first DATA_x read
pub const STATUS_NEWDAT: u8 = 1 << 1;
/// New data in GPR_READx, cleared by the first GPR_READx read
pub const STATUS_NEWGPR: u8 = 1 << 0;

/// AQI-UBA occupies the low three bits of DATA_AQI
pub const AQI_MASK: u8 = 0b0000_0111;

// =============================================================================
// Timing (milliseconds)
// =============================================================================

pub const RESET_SETTLE_MS: u32 = 1000;
pub const IDLE_SETTLE_MS: u32 = 250;
pub const NOP_SETTLE_MS: u32 = 150;
pub const CLEAR_GPR_SETTLE_MS: u32 = 350;
/// Settle after entering standard mode; the hot plates need the longest
pub const STANDARD_SETTLE_MS: u32 = 500;
/// Settle after a plain sleep/wake transition
pub const MODE_SETTLE_MS: u32 = 50;

// =============================================================================
// Compensation Range
// =============================================================================

pub const TEMPERATURE_MIN_C: f32 = -40.0;
pub const TEMPERATURE_MAX_C: f32 = 85.0;
pub const HUMIDITY_MIN_PCT: f32 = 0.0;
pub const HUMIDITY_MAX_PCT: f32 = 100.0;

// =============================================================================
// Enums
// =============================================================================

/// Device operating mode (OPMODE register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OperatingMode {
    /// Lowest power standby
    DeepSleep = 0x00,
    /// Low-power idle, registers accessible
    Idle = 0x01,
    /// Continuous gas sensing
    Standard = 0x02,
    /// Soft reset, device returns to deep sleep afterwards
    Reset = 0xF0,
}

impl OperatingMode {
    /// Convert from raw register value
    pub fn from_register(val: u8) -> Option<Self> {
        match val {
            0x00 => Some(Self::DeepSleep),
            0x01 => Some(Self::Idle),
            0x02 => Some(Self::Standard),
            0xF0 => Some(Self::Reset),
            _ => None,
        }
    }

    /// Convert to register value
    pub const fn to_register(self) -> u8 {
        self as u8
    }
}

/// Snapshot of the DEVICE_STATUS register
///
/// ```text
/// | b7     | b6     | b5 b4    | b3 b2    | b1     | b0     |
/// | STATAS | STATER | reserved | VALIDITY | NEWDAT | NEWGPR |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// An operating mode is running
    pub const fn running(self) -> bool {
        self.0 & STATUS_STATAS != 0
    }

    /// The device flagged a fatal internal error
    pub const fn fatal_error(self) -> bool {
        self.0 & STATUS_STATER != 0
    }

    /// Raw 2-bit validity code
    pub const fn validity_code(self) -> u8 {
        (self.0 & STATUS_VALIDITY_MASK) >> STATUS_VALIDITY_SHIFT
    }

    /// Decoded validity classification
    pub const fn validity(self) -> Validity {
        Validity::from_code(self.validity_code())
    }

    /// New measurement data is waiting in DATA_x
    pub const fn new_data(self) -> bool {
        self.0 & STATUS_NEWDAT != 0
    }

    /// New data is waiting in GPR_READx
    pub const fn new_gpr(self) -> bool {
        self.0 & STATUS_NEWGPR != 0
    }
}
