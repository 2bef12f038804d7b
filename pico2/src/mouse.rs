//! HID mouse report generation.
//!
//! The host only ever sees complete reports, so the button state has to be
//! carried between them: a move report sent while the button is held must
//! still have the button bit set.

use usbd_hid::descriptor::MouseReport;

/// Primary (left) button bit in `MouseReport::buttons`.
pub const BUTTON_PRIMARY: u8 = 0x01;

/// Button state of the emulated mouse.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MouseState {
    buttons: u8,
}

impl MouseState {
    pub const fn new() -> Self { Self { buttons: 0 } }

    #[inline]
    pub const fn is_pressed(&self) -> bool { self.buttons & BUTTON_PRIMARY != 0 }

    /// Report with the primary button down.
    pub fn press(&mut self) -> MouseReport {
        self.buttons |= BUTTON_PRIMARY;
        self.report(0, 0)
    }

    /// Report with the primary button up.
    pub fn release(&mut self) -> MouseReport {
        self.buttons &= !BUTTON_PRIMARY;
        self.report(0, 0)
    }

    /// Relative motion, keeping the current buttons.
    pub fn motion(
        &self,
        dx: i8,
        dy: i8,
    ) -> MouseReport {
        self.report(dx, dy)
    }

    /// Report with no buttons and no motion. Resets the state.
    pub fn idle(&mut self) -> MouseReport {
        self.buttons = 0;
        self.report(0, 0)
    }

    fn report(
        &self,
        x: i8,
        y: i8,
    ) -> MouseReport {
        MouseReport {
            buttons: self.buttons,
            x,
            y,
            wheel: 0,
            pan: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
