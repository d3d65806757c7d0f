//! Hardware-independent telemetry core for airwatch
//!
//! This crate contains the platform-agnostic logic of the airwatch
//! air-quality monitor: the ENS160 register driver and its bus helper,
//! fixed-capacity per-metric history buffers, the sparkline signal
//! conditioner and the line-plot scaler that map history onto a small
//! pixel display.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod bus;
pub mod config;
pub mod graph;
pub mod metrics;
pub mod sensors;
pub mod storage;
