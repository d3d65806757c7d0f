//! ENS160 digital metal-oxide multi-gas sensor driver
//!
//! Drives the ScioSense ENS160 through its register protocol over a blocking
//! I2C bus: soft reset and mode transitions, temperature/humidity
//! compensation, bounded status polling and the AQI/TVOC/eCO2 burst read.
//!
//! All waits are blocking and every poll loop is bounded, so a stuck bus
//! surfaces as [`DriverError::Timeout`] instead of hanging the caller.
//!
//! ```ignore
//! let mut ens160 = Ens160::new(i2c, delay);
//! ens160.configure()?;
//! ens160.set_environmental_compensation(22.5, 41.0)?;
//! ens160.update()?;
//! log::info!("eCO2 {} ppm ({:?})", ens160.eco2(), ens160.validity());
//! ```

mod error;
pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, error, info, warn};

use crate::bus::{BusError, RegisterBus};
use crate::config::PollConfig;
use crate::metrics::round_half_away;
use crate::sensors::{Reading, Validity};

pub use error::DriverError;
use registers::*;
pub use registers::{OperatingMode, Status};

/// Outcome of one bounded status-polling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollOutcome {
    /// NEWDAT observed; carries the status byte seen at that moment
    Ready(Status),
    /// STATER observed
    Fault(Status),
    /// Ceiling reached without either flag
    Exhausted,
}

/// Session state owned by the driver, replaced only by driver methods
#[derive(Debug, Clone, Copy, Default)]
struct SessionState {
    mode: Option<OperatingMode>,
    validity: Validity,
    eco2_ppm: u16,
    tvoc_ppb: u16,
    aqi: u8,
    temperature_c: f32,
    humidity_pct: f32,
    has_data: bool,
}

/// ENS160 driver over a blocking I2C bus and delay provider
pub struct Ens160<I2C, D> {
    bus: RegisterBus<I2C>,
    delay: D,
    poll: PollConfig,
    state: SessionState,
}

impl<I2C, D> Ens160<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for a device at [`DEFAULT_ADDRESS`]
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Create a driver for a device at a specific address
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address),
            delay,
            poll: PollConfig::default(),
            state: SessionState::default(),
        }
    }

    /// Replace the status polling limits
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Give the bus and delay back to the caller
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Reset the device and start continuous gas sensing
    ///
    /// Soft reset, idle, clear the general-purpose registers, then enter
    /// standard mode. On error the device is in an unknown state and the
    /// whole sequence must be repeated.
    pub fn configure(&mut self) -> Result<(), BusError> {
        info!("ENS160: configuring device at 0x{:02X}", self.bus.address());

        self.state = SessionState::default();

        self.set_mode_and_settle(OperatingMode::Reset, RESET_SETTLE_MS)?;
        self.set_mode_and_settle(OperatingMode::Idle, IDLE_SETTLE_MS)?;

        let part_id = self.part_id()?;
        if part_id != PART_ID {
            warn!(
                "ENS160: unexpected part id 0x{:04X} (expected 0x{:04X})",
                part_id, PART_ID
            );
        }

        self.write_command(CMD_NOP, NOP_SETTLE_MS)?;
        self.write_command(CMD_CLR_GPR, CLEAR_GPR_SETTLE_MS)?;

        self.set_mode_and_settle(OperatingMode::Standard, STANDARD_SETTLE_MS)?;

        info!("ENS160: standard gas sensing started");
        Ok(())
    }

    /// Enter deep sleep
    pub fn sleep(&mut self) -> Result<(), BusError> {
        self.set_mode_and_settle(OperatingMode::DeepSleep, MODE_SETTLE_MS)?;
        info!("ENS160: deep sleep");
        Ok(())
    }

    /// Leave deep sleep and resume standard gas sensing
    pub fn wake(&mut self) -> Result<(), BusError> {
        self.set_mode_and_settle(OperatingMode::Standard, MODE_SETTLE_MS)?;
        info!("ENS160: resumed standard mode");
        Ok(())
    }

    /// Write an operating mode and wait for it to settle
    pub fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), BusError> {
        self.set_mode_and_settle(mode, MODE_SETTLE_MS)
    }

    /// Read back the OPMODE register
    ///
    /// # Returns
    /// `None` if the register holds a value outside the documented modes
    pub fn operating_mode(&mut self) -> Result<Option<OperatingMode>, BusError> {
        let raw = self.bus.read_register(ADDR_OPMODE)?;
        Ok(OperatingMode::from_register(raw))
    }

    /// Read the 16-bit PART_ID register (0x0160 for an ENS160)
    pub fn part_id(&mut self) -> Result<u16, BusError> {
        let mut buf = [0u8; 2];
        self.bus.read_burst(ADDR_PART_ID, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read the DEVICE_STATUS register once
    pub fn status(&mut self) -> Result<Status, BusError> {
        self.bus.read_register(ADDR_DEVICE_STATUS).map(Status)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Feed ambient temperature and humidity to the on-chip compensation
    ///
    /// Inputs outside -40..85 °C and 0..100 %RH are clamped, not rejected.
    pub fn set_environmental_compensation(
        &mut self,
        temperature_c: f32,
        humidity_pct: f32,
    ) -> Result<(), BusError> {
        let temperature_c = clamp_input(temperature_c, TEMPERATURE_MIN_C, TEMPERATURE_MAX_C);
        let humidity_pct = clamp_input(humidity_pct, HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT);
        let payload = encode_compensation(temperature_c, humidity_pct);

        self.bus.write_burst(ADDR_TEMP_IN, &payload)?;

        self.state.temperature_c = temperature_c;
        self.state.humidity_pct = humidity_pct;
        debug!(
            "ENS160: compensation set to {} °C / {} %RH",
            temperature_c, humidity_pct
        );
        Ok(())
    }

    /// Wait for a new measurement and read it
    ///
    /// Polls DEVICE_STATUS until NEWDAT or STATER is set, at most
    /// `max_attempts` times with `interval_ms` between reads, then reads
    /// AQI, TVOC and eCO2 in one burst. The cached reading only changes
    /// when the burst succeeds, and its validity is the one carried by the
    /// status byte that reported the new data.
    pub fn update(&mut self) -> Result<(), DriverError> {
        let status = match self.poll_status()? {
            PollOutcome::Ready(status) => status,
            PollOutcome::Fault(status) => {
                error!("ENS160: fatal device error (status 0x{:02X})", status.0);
                return Err(DriverError::DeviceFault { status: status.0 });
            }
            PollOutcome::Exhausted => {
                let attempts = self.poll_ceiling();
                warn!("ENS160: no new data after {} status polls", attempts);
                return Err(DriverError::Timeout { attempts });
            }
        };

        let mut data = [0u8; DATA_BURST_LEN];
        self.bus.read_burst(ADDR_DATA_AQI, &mut data)?;

        self.state.aqi = data[0] & AQI_MASK;
        self.state.tvoc_ppb = u16::from_le_bytes([data[1], data[2]]);
        self.state.eco2_ppm = u16::from_le_bytes([data[3], data[4]]);
        self.state.validity = status.validity();
        self.state.has_data = true;

        if !self.state.validity.is_normal() {
            warn!("ENS160: reading flagged {:?}", self.state.validity);
        }
        debug!(
            "ENS160: eCO2 {} ppm, TVOC {} ppb, AQI {}",
            self.state.eco2_ppm, self.state.tvoc_ppb, self.state.aqi
        );

        Ok(())
    }

    // =========================================================================
    // Cached State
    // =========================================================================

    /// Last eCO2 concentration in ppm
    pub fn eco2(&self) -> u16 {
        self.state.eco2_ppm
    }

    /// Last TVOC concentration in ppb
    pub fn tvoc(&self) -> u16 {
        self.state.tvoc_ppb
    }

    /// Last AQI-UBA class (1-5)
    pub fn aqi(&self) -> u8 {
        self.state.aqi
    }

    /// Validity of the last reading
    pub fn validity(&self) -> Validity {
        self.state.validity
    }

    /// Operating mode last written by this driver
    pub fn mode(&self) -> Option<OperatingMode> {
        self.state.mode
    }

    /// Status polling limits in use
    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Snapshot of the last successful update
    pub fn last_reading(&self) -> Option<Reading> {
        if !self.state.has_data {
            return None;
        }

        Some(Reading {
            eco2_ppm: self.state.eco2_ppm,
            tvoc_ppb: self.state.tvoc_ppb,
            aqi: self.state.aqi,
            temperature_c: self.state.temperature_c,
            humidity_pct: self.state.humidity_pct,
            validity: self.state.validity,
        })
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn set_mode_and_settle(&mut self, mode: OperatingMode, settle_ms: u32) -> Result<(), BusError> {
        self.bus.write_register(ADDR_OPMODE, mode.to_register())?;
        self.state.mode = Some(mode);
        self.delay.delay_ms(settle_ms);
        Ok(())
    }

    fn write_command(&mut self, command: u8, settle_ms: u32) -> Result<(), BusError> {
        self.bus.write_register(ADDR_COMMAND, command)?;
        self.delay.delay_ms(settle_ms);
        Ok(())
    }

    fn poll_ceiling(&self) -> u16 {
        self.poll.max_attempts.max(1)
    }

    fn poll_status(&mut self) -> Result<PollOutcome, BusError> {
        let ceiling = self.poll_ceiling();

        for attempt in 1..=ceiling {
            let status = self.status()?;

            if status.fatal_error() {
                return Ok(PollOutcome::Fault(status));
            }
            if status.new_data() {
                debug!("ENS160: new data after {} polls", attempt);
                return Ok(PollOutcome::Ready(status));
            }
            if attempt < ceiling {
                self.delay.delay_ms(self.poll.interval_ms);
            }
        }

        Ok(PollOutcome::Exhausted)
    }
}

/// Encode temperature and humidity into the TEMP_IN/RH_IN payload
///
/// Temperature is Kelvin x 64 and humidity is %RH x 512, both rounded to
/// the nearest integer and packed little-endian. The conversion runs on
/// milli-units in integer arithmetic. Inputs are expected in range; see
/// [`Ens160::set_environmental_compensation`] for clamping.
pub fn encode_compensation(temperature_c: f32, humidity_pct: f32) -> [u8; COMPENSATION_BURST_LEN] {
    let milli_c = round_half_away(temperature_c * 1000.0);
    let milli_pct = round_half_away(humidity_pct * 1000.0);

    let kelvin_milli = (milli_c + 273_150).max(0) as u32;
    let temp_raw = ((kelvin_milli * 64 + 500) / 1000) as u16;
    let hum_raw = ((milli_pct.max(0) as u32 * 512 + 500) / 1000) as u16;

    let [t0, t1] = temp_raw.to_le_bytes();
    let [h0, h1] = hum_raw.to_le_bytes();
    [t0, t1, h0, h1]
}

fn clamp_input(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}
