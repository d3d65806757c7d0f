//! Register-addressed transactions over a blocking I2C bus
//!
//! Every access is a single bus transaction: reads are a register-pointer
//! write followed by a repeated-start read, writes carry the register
//! pointer and the payload in one frame. Multi-byte registers are therefore
//! transferred atomically with respect to the bus.

use embedded_hal::i2c::{ErrorKind, I2c};
use log::error;
use thiserror_no_std::Error;

/// Largest payload a single burst write can carry
pub const MAX_BURST_LEN: usize = 8;

/// Transport-level failure, surfaced immediately and never retried here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// The I2C peripheral reported an error
    #[error("I2C transfer failed: {0:?}")]
    Transfer(ErrorKind),

    /// A burst write was larger than the frame buffer
    #[error("Burst of {len} bytes exceeds the {max}-byte frame limit")]
    BurstTooLong {
        /// Requested payload length
        len: usize,
        /// Maximum payload length
        max: usize,
    },
}

/// I2C device handle bound to one 7-bit address
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterBus<I2C>
where
    I2C: I2c,
{
    /// Bind an I2C bus to a device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address used for every transaction
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Give the underlying bus back to the caller
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Read a single byte from a register
    pub fn read_register(&mut self, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.read_burst(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Read `buf.len()` consecutive registers starting at `reg`
    pub fn read_burst(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(|e| transfer_error(reg, e))
    }

    /// Write a single byte to a register
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.write_burst(reg, &[value])
    }

    /// Write `data` to consecutive registers starting at `reg`
    pub fn write_burst(&mut self, reg: u8, data: &[u8]) -> Result<(), BusError> {
        if data.len() > MAX_BURST_LEN {
            return Err(BusError::BurstTooLong {
                len: data.len(),
                max: MAX_BURST_LEN,
            });
        }

        let mut frame = [0u8; MAX_BURST_LEN + 1];
        frame[0] = reg;
        frame[1..=data.len()].copy_from_slice(data);

        self.i2c
            .write(self.address, &frame[..=data.len()])
            .map_err(|e| transfer_error(reg, e))
    }
}

fn transfer_error<E: embedded_hal::i2c::Error>(reg: u8, e: E) -> BusError {
    error!("I2C transfer at register 0x{:02X} failed: {:?}", reg, e);
    BusError::Transfer(e.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Records every frame written and answers reads with a fixed pattern
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Bus);
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = 0xA0 + i as u8;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_burst_prefixes_register() {
        let mut bus = RegisterBus::new(RecordingBus::default(), 0x53);
        bus.write_burst(0x13, &[1, 2, 3, 4]).unwrap();

        let inner = bus.release();
        assert_eq!(inner.writes.len(), 1);
        assert_eq!(inner.writes[0], (0x53, alloc::vec![0x13, 1, 2, 3, 4]));
    }

    #[test]
    fn test_read_burst_sets_register_pointer() {
        let mut bus = RegisterBus::new(RecordingBus::default(), 0x53);
        let mut buf = [0u8; 3];
        bus.read_burst(0x21, &mut buf).unwrap();

        assert_eq!(buf, [0xA0, 0xA1, 0xA2]);
        assert_eq!(bus.release().writes[0], (0x53, alloc::vec![0x21]));
    }

    #[test]
    fn test_oversized_burst_is_rejected_without_touching_bus() {
        let mut bus = RegisterBus::new(RecordingBus::default(), 0x53);
        let data = [0u8; MAX_BURST_LEN + 1];

        assert_eq!(
            bus.write_burst(0x40, &data),
            Err(BusError::BurstTooLong {
                len: MAX_BURST_LEN + 1,
                max: MAX_BURST_LEN
            })
        );
        assert!(bus.release().writes.is_empty());
    }

    #[test]
    fn test_transfer_error_keeps_kind() {
        let mut bus = RegisterBus::new(
            RecordingBus {
                fail: true,
                ..Default::default()
            },
            0x53,
        );

        assert_eq!(
            bus.read_register(0x20),
            Err(BusError::Transfer(ErrorKind::Bus))
        );
    }
}
