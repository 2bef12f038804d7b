//! Interfaces to the hardware around the measurement core.
//!
//! The controller is generic over these traits; the firmware implements them
//! on top of embassy-rp peripherals and the simulator on top of a modelled
//! device under test. All calls are assumed to succeed once the peripheral is
//! initialized; a peripheral that cannot be initialized is a
//! [`FatalHardwareFault`](crate::error::FatalHardwareFault) raised by the board
//! before a controller exists.

use crate::frame::DisplayFrame;

/// Photosensor front end.
pub trait SensorSampler {
    /// One analog-to-digital conversion of the brightness channel.
    ///
    /// The analog input may need time to settle after the scene changes, which
    /// is why the controller always samples the baseline twice.
    async fn read(&mut self) -> u16;
}

/// Simulated pointer device presented to the host under test.
pub trait InputInjector {
    /// Open a logical HID session.
    async fn begin(&mut self);

    /// Close the session, leaving no button held.
    async fn end(&mut self);

    /// Press the primary button and keep it held.
    async fn press(&mut self);

    /// Release the primary button.
    async fn release(&mut self);

    /// Press and release the primary button.
    async fn click(&mut self);

    /// Relative pointer motion.
    async fn move_by(
        &mut self,
        dx: i8,
        dy: i8,
    );
}

/// Status display.
pub trait DisplayPresenter {
    /// Replace the panel contents with `frame`.
    fn render(
        &mut self,
        frame: &DisplayFrame,
    );
}

/// Start/cancel push button, read as a level.
pub trait StartButton {
    /// True while the button is held down (active-low line already decoded).
    fn is_pressed(&mut self) -> bool;
}

/// Monotonic high-resolution time source.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_us(&self) -> u64;
}

/// The set of peripherals a [`MeasurementController`](crate::controller::MeasurementController) drives.
///
/// `W` is any [`embedded_hal_async::delay::DelayNs`] implementation.
pub struct Bench<S, I, D, B, C, W> {
    pub sensor: S,
    pub injector: I,
    pub display: D,
    pub button: B,
    pub clock: C,
    pub delay: W,
}
