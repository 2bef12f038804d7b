//! SSD1306 128x64 OLED on I2C0.
//!
//! Pin mapping:
//! - SDA: GPIO4
//! - SCL: GPIO5
//!
//! Frames are drawn into the driver's RAM buffer and pushed to the panel in
//! one blocking transfer (1 KiB at 400 kHz, about 25 ms).

use defmt::warn;
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use m2p_latency::config::DISPLAY_I2C_ADDR;
use m2p_latency::error::FatalHardwareFault;
use m2p_latency::frame::DisplayFrame;
use m2p_latency::hal::DisplayPresenter;
use m2p_latency::render::draw_frame;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

/// I2C fast mode.
pub fn display_i2c_config() -> i2c::Config {
    let mut config = i2c::Config::default();
    config.frequency = 400_000;
    config
}

type Panel = Ssd1306<
    I2CInterface<I2c<'static, I2C0, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Status display backed by the SSD1306.
pub struct Oled {
    panel: Panel,
}

impl Oled {
    /// Initialize the controller. A panel that does not answer is fatal.
    pub fn new(i2c: I2c<'static, I2C0, Blocking>) -> Result<Self, FatalHardwareFault> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDR);
        let mut panel =
            Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode();
        panel.init().map_err(|_| FatalHardwareFault::DisplayInit)?;
        Ok(Self { panel })
    }
}

impl DisplayPresenter for Oled {
    fn render(
        &mut self,
        frame: &DisplayFrame,
    ) {
        // Drawing only touches the RAM buffer; the flush is the bus transfer.
        draw_frame(&mut self.panel, frame).ok();
        if self.panel.flush().is_err() {
            warn!("Display flush failed");
        }
    }
}
