//! Board wiring and sensor profile selection.
//!
//! Pin mapping (Raspberry Pi Pico 2):
//! - Photosensor: GPIO26 (ADC0)
//! - OLED SSD1306: I2C0, SDA GPIO4, SCL GPIO5, address 0x3C
//! - Start/cancel button: GPIO15 to GND (internal pull-up, active-low)
//! - Status LED: GPIO25 (on-board)
//! - Host connection: native USB (HID mouse)

use m2p_latency::config::{Injection, MeasurementConfig, ThresholdMode};

// =============================================================================
// Sensor Profiles
// =============================================================================

#[cfg(all(feature = "sensor-ldr", feature = "sensor-photodiode"))]
compile_error!("Only one sensor profile can be enabled at a time. Choose one of: sensor-ldr, sensor-photodiode");

/// Threshold for a light-dependent resistor divider. Its output swings with
/// the ambient level, so the change is relative to the baseline.
pub const LDR_THRESHOLD: ThresholdMode = ThresholdMode::PercentOfBaseline(20);

/// Threshold for a photodiode front end. Fast and linear, but the dark level
/// sits near zero, so a relative threshold would trigger on noise.
pub const PHOTODIODE_THRESHOLD: ThresholdMode = ThresholdMode::Absolute(20);

/// Threshold of the profile selected at build time.
pub const fn sensor_threshold() -> ThresholdMode {
    if cfg!(feature = "sensor-photodiode") {
        PHOTODIODE_THRESHOLD
    } else {
        LDR_THRESHOLD
    }
}

/// Measurement configuration for this board.
///
/// The button is held from injection until detection, which a browser
/// mouse-down handler reacts to just like a click.
pub const fn measurement_config() -> MeasurementConfig {
    MeasurementConfig::DEFAULT
        .with_threshold(sensor_threshold())
        .with_injection(Injection::Press)
}

// =============================================================================
// USB Identity
// =============================================================================

/// pid.codes test VID/PID.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

pub const USB_MANUFACTURER: &str = "m2p-latency";
pub const USB_PRODUCT: &str = "m2p-latency tester";

/// HID interrupt endpoint poll interval. 1 ms is the fastest full-speed rate.
pub const HID_POLL_MS: u8 = 1;

// =============================================================================
// Unit Tests
// =============================================================================
