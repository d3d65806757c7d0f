use thiserror_no_std::Error;

use crate::bus::BusError;

/// Errors returned by [`Ens160::update`](super::Ens160::update)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Bus transfer failed; not retried by the driver
    #[error("Bus error: {0}")]
    Bus(BusError),

    /// The status register never reported new data within the poll ceiling
    #[error("No new data after {attempts} status polls")]
    Timeout {
        /// Number of status reads performed
        attempts: u16,
    },

    /// The device set its fatal error flag; it needs a full reconfigure
    #[error("Device reported a fatal error (status 0x{status:02X})")]
    DeviceFault {
        /// Status byte carrying the error flag
        status: u8,
    },
}

impl From<BusError> for DriverError {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}
