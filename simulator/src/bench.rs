//! Simulated peripherals for the measurement controller.
//!
//! Everything runs on the main thread; the window and the device model are
//! shared through `Rc<RefCell<_>>` and never borrowed across an await.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal_async::delay::DelayNs;
use m2p_latency::frame::DisplayFrame;
use m2p_latency::hal::{Clock, DisplayPresenter, InputInjector, SensorSampler, StartButton};

use crate::dut::DeviceUnderTest;
use crate::panel::Panel;
use crate::timing::{FRAME_TIME, SAMPLE_TIME};

pub type Shared<T> = Rc<RefCell<T>>;

/// Microseconds since the simulator started.
#[derive(Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Clock for StdClock {
    fn now_us(&self) -> u64 { self.origin.elapsed().as_micros() as u64 }
}

/// Photosensor looking at the simulated screen.
pub struct SimSensor {
    dut: Shared<DeviceUnderTest>,
    panel: Shared<Panel>,
    clock: StdClock,
}

impl SimSensor {
    pub fn new(
        dut: Shared<DeviceUnderTest>,
        panel: Shared<Panel>,
        clock: StdClock,
    ) -> Self {
        Self { dut, panel, clock }
    }
}

impl SensorSampler for SimSensor {
    async fn read(&mut self) -> u16 {
        // The controller busy-polls the sensor, so this keeps the window alive.
        self.panel.borrow_mut().pump();
        thread::sleep(SAMPLE_TIME);
        self.dut.borrow_mut().level(self.clock.now_us())
    }
}

/// Mouse wired straight into the device model: any input schedules a change.
pub struct SimMouse {
    dut: Shared<DeviceUnderTest>,
    clock: StdClock,
}

impl SimMouse {
    pub fn new(
        dut: Shared<DeviceUnderTest>,
        clock: StdClock,
    ) -> Self {
        Self { dut, clock }
    }

    fn trigger(&self) { self.dut.borrow_mut().trigger(self.clock.now_us()); }
}

impl InputInjector for SimMouse {
    async fn begin(&mut self) { log::debug!("mouse: session open"); }

    async fn end(&mut self) { log::debug!("mouse: session closed"); }

    async fn press(&mut self) { self.trigger(); }

    async fn release(&mut self) {}

    async fn click(&mut self) { self.trigger(); }

    async fn move_by(
        &mut self,
        _dx: i8,
        _dy: i8,
    ) {
        self.trigger();
    }
}

pub struct SimDisplay {
    panel: Shared<Panel>,
}

impl SimDisplay {
    pub fn new(panel: Shared<Panel>) -> Self { Self { panel } }
}

impl DisplayPresenter for SimDisplay {
    fn render(
        &mut self,
        frame: &DisplayFrame,
    ) {
        self.panel.borrow_mut().show(frame);
    }
}

/// Space bar as the start/cancel button.
pub struct SpaceBar {
    panel: Shared<Panel>,
}

impl SpaceBar {
    pub fn new(panel: Shared<Panel>) -> Self { Self { panel } }
}

impl StartButton for SpaceBar {
    fn is_pressed(&mut self) -> bool { self.panel.borrow_mut().is_button_down() }
}

/// Sleeps in frame-sized slices so the window keeps processing events.
pub struct StdDelay {
    panel: Shared<Panel>,
}

impl StdDelay {
    pub fn new(panel: Shared<Panel>) -> Self { Self { panel } }
}

impl DelayNs for StdDelay {
    async fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        loop {
            self.panel.borrow_mut().pump();
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(FRAME_TIME));
        }
    }
}
