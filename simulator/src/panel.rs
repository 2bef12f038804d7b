//! Simulator window: the OLED panel plus the start/cancel button (space bar).

use std::time::Instant;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use m2p_latency::cancel::InterruptController;
use m2p_latency::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use m2p_latency::frame::DisplayFrame;
use m2p_latency::render::draw_frame;

use crate::timing::FRAME_TIME;

pub struct Panel {
    display: SimulatorDisplay<BinaryColor>,
    window: Window,
    irq: InterruptController<'static>,
    space: SpaceKey,
    last_pump: Instant,
}

impl Panel {
    pub fn new(irq: InterruptController<'static>) -> Self {
        let display = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let output_settings = OutputSettingsBuilder::new()
            .theme(BinaryColorTheme::OledBlue)
            .scale(3)
            .build();
        let mut window = Window::new("m2p-latency", &output_settings);
        window.update(&display);

        Self {
            display,
            window,
            irq,
            space: SpaceKey::default(),
            last_pump: Instant::now(),
        }
    }

    /// Draw `frame` and present it.
    pub fn show(
        &mut self,
        frame: &DisplayFrame,
    ) {
        draw_frame(&mut self.display, frame).ok();
        self.window.update(&self.display);
        self.last_pump = Instant::now();
    }

    /// Handle window events, at most once per [`FRAME_TIME`].
    ///
    /// Space down is the button's falling edge. Closing the window exits.
    pub fn pump(&mut self) {
        if self.last_pump.elapsed() < FRAME_TIME {
            return;
        }
        self.last_pump = Instant::now();
        self.window.update(&self.display);

        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => {
                    log::info!("Window closed");
                    std::process::exit(0);
                }
                SimulatorEvent::KeyDown {
                    keycode: Keycode::Space,
                    repeat: false,
                    ..
                } => {
                    self.space.key_down();
                    self.irq.on_falling_edge();
                }
                SimulatorEvent::KeyUp {
                    keycode: Keycode::Space,
                    ..
                } => self.space.key_up(),
                _ => {}
            }
        }
    }

    /// Pressed now, or tapped within the events this call pumped.
    ///
    /// Taps pumped elsewhere (a cancel during a batch) do not count.
    pub fn is_button_down(&mut self) -> bool {
        self.space.forget_tap();
        self.pump();
        self.space.poll()
    }
}

/// Space bar level with a latch for taps shorter than one event batch.
#[derive(Default)]
struct SpaceKey {
    down: bool,
    tapped: bool,
}

impl SpaceKey {
    fn key_down(&mut self) {
        self.down = true;
        self.tapped = true;
    }

    fn key_up(&mut self) { self.down = false; }

    fn forget_tap(&mut self) { self.tapped = false; }

    fn poll(&mut self) -> bool {
        let pressed = self.down || self.tapped;
        self.tapped = false;
        pressed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
