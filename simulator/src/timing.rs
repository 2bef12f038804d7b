//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the core crate.

use std::time::Duration;

/// Window refresh and event poll interval (~50 FPS).
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Time one simulated ADC conversion takes.
pub const SAMPLE_TIME: Duration = Duration::from_micros(20);

/// Default response time of the simulated device (one frame at 60 Hz).
pub const DEFAULT_RESPONSE: Duration = Duration::from_micros(16_667);

/// Spread added on top of the response time, cycling through the range.
pub const RESPONSE_JITTER: Duration = Duration::from_millis(4);
