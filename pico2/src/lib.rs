//! Tester firmware library - host-testable parts of the Pico 2 board support.
//!
//! The binary (`main.rs`) wires embassy-rp peripherals to the measurement
//! core; everything here is plain logic that runs on the host as well.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p m2p-latency-pico2 --lib --target x86_64-unknown-linux-gnu
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod board;
pub mod mouse;

pub use board::measurement_config;
pub use mouse::MouseState;
