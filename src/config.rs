//! Measurement configuration and display geometry.
//!
//! Everything an operator might want to tune lives in [`MeasurementConfig`].
//! The defaults reproduce the settings the tester shipped with: ten cycles,
//! a 20 % brightness threshold and a 112 µs internal latency floor.
//!
//! Board-specific items (pins, ADC channel) belong to the firmware crate.

use crate::error::ConfigError;
pub use crate::threshold::ThresholdMode;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (SSD1306 128x64).
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Top edge of the lower screen region (large value / prompt).
pub const LOWER_CURSOR_Y: i32 = SCREEN_HEIGHT as i32 / 2 - 4;

/// I2C address of the SSD1306 controller.
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// On/off period of the fatal-fault LED blink.
pub const BLINK_DELAY_MS: u64 = 200;

/// Capacity of a single text line in a [`DisplayFrame`](crate::frame::DisplayFrame).
pub const LINE_LEN: usize = 32;

// =============================================================================
// Batch Configuration
// =============================================================================

/// Upper bound on the batch size (fixed sample storage).
pub const MAX_CYCLES: usize = 64;

/// Default number of cycles per batch.
pub const DEFAULT_NUM_CYCLES: usize = 10;

/// Default fixed delay of the sensing + injection path, measured on the
/// reference hardware (USB HID poll + ADC conversion).
pub const DEFAULT_LATENCY_FLOOR_US: u32 = 112;

const _: () = assert!(DEFAULT_NUM_CYCLES > 0 && DEFAULT_NUM_CYCLES <= MAX_CYCLES);

/// Pointer action used to provoke a visible change on the device under test.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Injection {
    /// Press the primary button at trigger time, release it once the change is detected.
    Press,
    /// Full click (press + release) at trigger time.
    Click,
    /// Relative vertical move. The direction alternates every cycle so the
    /// pointer returns to where it started.
    Move { step: i8 },
}

/// Tunable parameters of a measurement batch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementConfig {
    /// Valid cycles per batch.
    pub num_cycles: usize,
    /// Brightness change that counts as the device reacting.
    pub threshold: ThresholdMode,
    /// Wait between the first (settling) and second (reference) baseline read.
    pub settle_ms: u32,
    /// How long a cycle result stays on screen before the next cycle arms.
    pub result_hold_ms: u32,
    /// Raw latencies below this are sensor noise; valid ones have it subtracted.
    pub latency_floor_us: u32,
    /// Pointer action to inject.
    pub injection: Injection,
}

impl MeasurementConfig {
    pub const DEFAULT: Self = Self {
        num_cycles: DEFAULT_NUM_CYCLES,
        threshold: ThresholdMode::PercentOfBaseline(20),
        settle_ms: 500,
        result_hold_ms: 500,
        latency_floor_us: DEFAULT_LATENCY_FLOOR_US,
        injection: Injection::Press,
    };

    pub const fn with_num_cycles(
        mut self,
        num_cycles: usize,
    ) -> Self {
        self.num_cycles = num_cycles;
        self
    }

    pub const fn with_threshold(
        mut self,
        threshold: ThresholdMode,
    ) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn with_settle_ms(
        mut self,
        settle_ms: u32,
    ) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub const fn with_result_hold_ms(
        mut self,
        result_hold_ms: u32,
    ) -> Self {
        self.result_hold_ms = result_hold_ms;
        self
    }

    pub const fn with_latency_floor_us(
        mut self,
        latency_floor_us: u32,
    ) -> Self {
        self.latency_floor_us = latency_floor_us;
        self
    }

    pub const fn with_injection(
        mut self,
        injection: Injection,
    ) -> Self {
        self.injection = injection;
        self
    }

    /// Check the configuration before a controller is built from it.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.num_cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        if self.num_cycles > MAX_CYCLES {
            return Err(ConfigError::TooManyCycles(self.num_cycles));
        }
        if !self.threshold.is_valid() {
            return Err(ConfigError::InvalidThreshold);
        }
        if let Injection::Move { step: 0 } = self.injection {
            return Err(ConfigError::ZeroMoveStep);
        }
        Ok(())
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Unit Tests
// =============================================================================
