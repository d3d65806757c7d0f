//! Desktop simulator for the airwatch telemetry core.
//!
//! Runs the real ENS160 driver against an in-memory register file that
//! behaves like the sensor: mode changes, a warm-up period, a NEWDAT flag
//! that rises after a few status polls, and the occasional stalled
//! measurement. Readings flow through the telemetry tracker and the
//! conditioned sparkline and plot scale are written to the log.
//!
//! Set `RUST_LOG=debug` to see per-poll driver detail.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use embedded_graphics::prelude::*;
use log::{error, info, warn};

use airwatch_core::config::{MonitorConfig, PollConfig};
use airwatch_core::graph::{LinePlot, Sparkline};
use airwatch_core::metrics::{
    AirQuality, Co2Level, ComfortStatus, HeatRisk, comfort_index, heat_index,
    humidity_comfort_index, temperature_comfort_index,
};
use airwatch_core::sensors::ens160::registers::{
    ADDR_COMMAND, ADDR_DATA_AQI, ADDR_DEVICE_STATUS, ADDR_OPMODE, ADDR_PART_ID, ADDR_TEMP_IN,
    CMD_CLR_GPR, DEFAULT_ADDRESS, OperatingMode, PART_ID, STATUS_NEWDAT, STATUS_STATAS,
    STATUS_VALIDITY_SHIFT,
};
use airwatch_core::sensors::{DriverError, Ens160};
use airwatch_core::storage::{Metric, Telemetry, WindowStats, percent_above};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Acquisition cycles to run before exiting.
const SIM_CYCLES: u64 = 48;

/// Status polls before a fresh measurement is flagged.
const POLLS_PER_MEASUREMENT: u16 = 20;

/// Measurements reported with the warm-up validity code.
const WARM_UP_MEASUREMENTS: u32 = 4;

/// Every n-th measurement stalls long enough to trip the poll ceiling once.
const STALL_EVERY: u32 = 17;

/// Extra polls a stalled measurement needs.
const STALL_POLLS: u16 = 60;

/// Poll limits for the simulation, shorter than the hardware default.
const SIM_POLL: PollConfig = PollConfig {
    max_attempts: 50,
    interval_ms: 1,
};

/// Cycles between two sparkline dumps.
const RENDER_EVERY: u64 = 12;

/// Pause between acquisition cycles.
const CYCLE_PAUSE: Duration = Duration::from_millis(100);

/// Block characters used to print a sparkline, lowest first.
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

// ---------------------------------------------------------------------------
// Simulated ENS160
// ---------------------------------------------------------------------------

/// Register-level ENS160 model behind a blocking I2C interface.
struct SimulatedEns160 {
    registers: [u8; 256],
    pointer: u8,
    polls_until_ready: u16,
    measurements: u32,
}

impl SimulatedEns160 {
    fn new() -> Self {
        let mut sim = Self {
            registers: [0; 256],
            pointer: 0,
            polls_until_ready: POLLS_PER_MEASUREMENT,
            measurements: 0,
        };
        sim.power_on_reset();
        sim
    }

    fn power_on_reset(&mut self) {
        self.registers = [0; 256];
        self.registers[ADDR_PART_ID as usize..ADDR_PART_ID as usize + 2]
            .copy_from_slice(&PART_ID.to_le_bytes());
    }

    fn mode(&self) -> Option<OperatingMode> {
        OperatingMode::from_register(self.registers[ADDR_OPMODE as usize])
    }

    fn write(&mut self, reg: u8, data: &[u8]) {
        match reg {
            ADDR_OPMODE if data[0] == OperatingMode::Reset.to_register() => {
                self.power_on_reset();
                self.measurements = 0;
            }
            ADDR_OPMODE => {
                self.registers[ADDR_OPMODE as usize] = data[0];
                self.polls_until_ready = POLLS_PER_MEASUREMENT;
            }
            ADDR_COMMAND if data[0] == CMD_CLR_GPR => {
                self.registers[0x48..0x50].fill(0);
            }
            _ => {
                let start = reg as usize;
                self.registers[start..start + data.len()].copy_from_slice(data);
            }
        }
    }

    fn read(&mut self, reg: u8, buf: &mut [u8]) {
        match reg {
            ADDR_DEVICE_STATUS => buf[0] = self.poll_status(),
            ADDR_DATA_AQI => {
                let start = reg as usize;
                buf.copy_from_slice(&self.registers[start..start + buf.len()]);
                self.registers[ADDR_DEVICE_STATUS as usize] &= !STATUS_NEWDAT;
                self.polls_until_ready = if self.measurements % STALL_EVERY == 0 {
                    POLLS_PER_MEASUREMENT + STALL_POLLS
                } else {
                    POLLS_PER_MEASUREMENT
                };
            }
            _ => {
                let start = reg as usize;
                buf.copy_from_slice(&self.registers[start..start + buf.len()]);
            }
        }
    }

    fn poll_status(&mut self) -> u8 {
        if self.mode() != Some(OperatingMode::Standard) {
            return 0;
        }

        let validity: u8 = if self.measurements < WARM_UP_MEASUREMENTS { 1 } else { 0 };
        let status_reg = ADDR_DEVICE_STATUS as usize;

        if self.registers[status_reg] & STATUS_NEWDAT == 0 {
            if self.polls_until_ready == 0 {
                self.measure();
                self.registers[status_reg] |= STATUS_NEWDAT;
            } else {
                self.polls_until_ready -= 1;
            }
        }

        self.registers[status_reg] =
            STATUS_STATAS | (validity << STATUS_VALIDITY_SHIFT) | (self.registers[status_reg] & STATUS_NEWDAT);
        self.registers[status_reg]
    }

    /// Produce the next gas measurement, nudged by the compensation inputs.
    fn measure(&mut self) {
        self.measurements += 1;
        let t = self.measurements as f64;

        let temp_raw = u16::from_le_bytes([
            self.registers[ADDR_TEMP_IN as usize],
            self.registers[ADDR_TEMP_IN as usize + 1],
        ]);
        let temperature_c = temp_raw as f64 / 64.0 - 273.15;
        let warm_bias = if temp_raw == 0 { 0.0 } else { (temperature_c - 22.0) * 4.0 };

        let eco2 = (650.0 + 320.0 * (t / 9.0).sin() + 45.0 * (t / 3.7).cos() + warm_bias)
            .clamp(400.0, 65_000.0) as u16;
        let tvoc = ((eco2 - 400) as f64 * 0.7) as u16;
        let aqi: u8 = match eco2 {
            0..600 => 1,
            600..800 => 2,
            800..1000 => 3,
            1000..1500 => 4,
            _ => 5,
        };

        let base = ADDR_DATA_AQI as usize;
        self.registers[base] = aqi;
        self.registers[base + 1..base + 3].copy_from_slice(&tvoc.to_le_bytes());
        self.registers[base + 3..base + 5].copy_from_slice(&eco2.to_le_bytes());
    }
}

impl ErrorType for SimulatedEns160 {
    type Error = ErrorKind;
}

impl I2c for SimulatedEns160 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != DEFAULT_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ));
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        return Err(ErrorKind::Other);
                    };
                    self.pointer = reg;
                    if !data.is_empty() {
                        self.write(reg, data);
                    }
                }
                Operation::Read(buf) => self.read(self.pointer, buf),
            }
        }
        Ok(())
    }
}

/// Blocking delay backed by `std::thread::sleep`.
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

// ---------------------------------------------------------------------------
// Ambient generator
// ---------------------------------------------------------------------------

/// Synthetic room temperature and humidity, as a companion sensor would report.
fn ambient(cycle: u64) -> (f32, f32) {
    let t = cycle as f64;
    let temperature = 23.0 + 4.0 * (t / 14.0).sin() + 0.4 * (t / 3.0).cos();
    let humidity = 48.0 + 12.0 * (t / 20.0).sin() + 2.0 * (t / 5.0).cos();
    (temperature as f32, humidity as f32)
}

// ---------------------------------------------------------------------------
// Log rendering
// ---------------------------------------------------------------------------

fn sparkline_text(rows: &[i16], height: i16) -> String {
    let top = (height - 1).max(1) as usize;
    rows.iter()
        .map(|&row| SPARK_GLYPHS[row.max(0) as usize * (SPARK_GLYPHS.len() - 1) / top])
        .collect()
}

fn render<const MAX: usize>(telemetry: &mut Telemetry<MAX>, config: &MonitorConfig) {
    let sparkline = Sparkline::from_config(&config.sparkline);
    let plot = LinePlot::from_config(&config.plot, Point::zero());

    for metric in [Metric::Eco2, Metric::Temperature, Metric::Humidity] {
        let window = telemetry.history_mut(metric).contiguous();
        let rows = sparkline.process(window);

        info!(
            "{:>8} {}",
            metric.label(),
            sparkline_text(&rows, sparkline.height())
        );

        if let Some(scale) = plot.scale(window) {
            info!(
                "{:>8} plot {}..{} {} ({} segments, {:.3} px/unit, newest at {:?})",
                "",
                scale.min_label(),
                scale.max_label(),
                metric.unit(),
                scale.segments().count(),
                scale.pixels_per_unit(),
                scale.points().next(),
            );
        }
    }

    let history = telemetry.history(Metric::Eco2);
    let samples: Vec<i16> = history.iter().collect();
    if let Some(stats) = WindowStats::from_samples(&samples) {
        info!(
            "eCO2 window: min {} / avg {} / max {} ppm over {} samples, {}% above 1000 ppm",
            stats.min,
            stats.avg,
            stats.max,
            stats.count,
            percent_above(&samples, 1000)
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting airwatch simulator ({} cycles)", SIM_CYCLES);

    let config = MonitorConfig {
        poll: SIM_POLL,
        ..MonitorConfig::default()
    };

    let mut ens160 =
        Ens160::new(SimulatedEns160::new(), StdDelay).with_poll_config(config.poll);
    if let Err(e) = ens160.configure() {
        error!("ENS160 configuration failed: {}", e);
        return;
    }

    let mut telemetry: Telemetry = Telemetry::new(&config.history);

    // -----------------------------------------------------------------------
    // Acquisition loop
    // -----------------------------------------------------------------------
    for cycle in 0..SIM_CYCLES {
        // One stored sample per simulated granularity period
        let now_ms = cycle * config.history.granularity_ms;
        let (temperature, humidity) = ambient(cycle);

        if let Err(e) = ens160.set_environmental_compensation(temperature, humidity) {
            error!("Compensation write failed: {}", e);
            continue;
        }

        match ens160.update() {
            Ok(()) => {}
            Err(DriverError::Timeout { attempts }) => {
                warn!("Cycle {}: no data after {} polls, retrying next cycle", cycle, attempts);
                continue;
            }
            Err(e @ DriverError::DeviceFault { .. }) => {
                error!("Cycle {}: {}; reconfiguring", cycle, e);
                if let Err(e) = ens160.configure() {
                    error!("Reconfigure failed: {}", e);
                    return;
                }
                continue;
            }
            Err(e) => {
                error!("Cycle {}: {}", cycle, e);
                continue;
            }
        }

        let Some(reading) = ens160.last_reading() else {
            continue;
        };
        telemetry.record(now_ms, &reading);

        if telemetry.measurements_changed() {
            let hi = heat_index(reading.temperature_c, reading.humidity_pct);
            info!(
                "Cycle {:>2}: eCO2 {:>4} ppm ({}, avg {}, {}) | TVOC {:>4} ppb | AQI {} ({}) | {:.1} °C {:.0} % HI {:.1} ({}) [{}]",
                cycle,
                reading.eco2_ppm,
                Co2Level::assess(reading.eco2_ppm).label(),
                telemetry.eco2_average(),
                telemetry.eco2_trend().label(),
                reading.tvoc_ppb,
                reading.aqi,
                AirQuality::from_index(reading.aqi).label(),
                reading.temperature_c,
                reading.humidity_pct,
                hi,
                HeatRisk::assess(hi).label(),
                reading.validity.label(),
            );
            info!(
                "Cycle {:>2}: {} | comfort {:+} (temperature {:+}, humidity {:+})",
                cycle,
                ComfortStatus::assess(
                    reading.eco2_ppm,
                    reading.aqi,
                    hi,
                    reading.humidity_pct,
                    reading.temperature_c,
                )
                .label(),
                comfort_index(reading.temperature_c, reading.humidity_pct),
                temperature_comfort_index(reading.temperature_c),
                humidity_comfort_index(reading.humidity_pct),
            );
        }

        if (cycle + 1) % RENDER_EVERY == 0 {
            render(&mut telemetry, &config);
        }

        thread::sleep(CYCLE_PAUSE);
    }

    if let Err(e) = ens160.sleep() {
        warn!("Could not put ENS160 to sleep: {}", e);
    }
    info!("Simulator exiting");
}
