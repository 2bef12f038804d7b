//! Measurement core of the mouse-to-photon latency tester.
//!
//! The tester injects a pointer event into a host over USB HID and times how
//! long it takes until a photosensor on the host's screen sees the brightness
//! change. This crate is the platform-agnostic part shared between the Pico 2
//! firmware and the desktop simulator:
//!
//! - [`controller`]: cycle and batch state machine
//! - [`threshold`]: brightness-change detection
//! - [`statistics`]: mean and sample standard deviation of a batch
//! - [`cancel`]: button-driven cancellation signal
//! - [`frame`]: what to show on the panel
//! - [`render`]: drawing frames with `embedded-graphics`
//! - [`hal`]: traits the board implements
//! - [`config`]: constants and the measurement configuration
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` (tests run on the host with `std`). Logging goes
//! through `defmt` or `log` depending on the enabled feature.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod hal;
pub mod render;
pub mod statistics;
pub mod styles;
pub mod threshold;

// Re-export commonly used items
pub use cancel::{CancellationSignal, InterruptController};
pub use config::{Injection, MeasurementConfig, ThresholdMode};
pub use controller::{BatchOutcome, CycleOutcome, MeasurementController, Phase};
pub use error::{ConfigError, FatalHardwareFault, StatisticsError};
pub use frame::DisplayFrame;
pub use hal::Bench;
pub use statistics::Statistics;
