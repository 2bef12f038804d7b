//! Mouse-to-photon latency tester simulator for Desktop.
//!
//! Runs the measurement controller against a modelled device under test and
//! shows the OLED in an `embedded-graphics-simulator` window.
//!
//! Usage: `simulator [response_ms]` (default 16.667 ms, one 60 Hz frame).
//! Press SPACE to start a batch, SPACE again during a batch to cancel it.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod bench;
mod dut;
mod panel;
mod timing;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use embassy_futures::block_on;
use m2p_latency::cancel::{CancellationSignal, InterruptController};
use m2p_latency::config::MeasurementConfig;
use m2p_latency::controller::MeasurementController;
use m2p_latency::hal::Bench;

use crate::bench::{SimDisplay, SimMouse, SimSensor, SpaceBar, StdClock, StdDelay};
use crate::dut::DeviceUnderTest;
use crate::panel::Panel;
use crate::timing::{DEFAULT_RESPONSE, RESPONSE_JITTER};

static CANCEL: CancellationSignal = CancellationSignal::new();

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let response = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map_or(DEFAULT_RESPONSE, |ms| Duration::from_secs_f64(ms / 1000.0));
    log::info!(
        "Simulated response time: {} us (+ up to {} us jitter)",
        response.as_micros(),
        RESPONSE_JITTER.as_micros()
    );

    let clock = StdClock::new();
    let panel = Rc::new(RefCell::new(Panel::new(InterruptController::new(&CANCEL))));
    let dut = Rc::new(RefCell::new(DeviceUnderTest::new(
        response.as_micros() as u64,
        RESPONSE_JITTER.as_micros() as u64,
    )));

    let bench = Bench {
        sensor: SimSensor::new(Rc::clone(&dut), Rc::clone(&panel), clock),
        injector: SimMouse::new(dut, clock),
        display: SimDisplay::new(Rc::clone(&panel)),
        button: SpaceBar::new(Rc::clone(&panel)),
        clock,
        delay: StdDelay::new(panel),
    };

    let mut controller = match MeasurementController::new(MeasurementConfig::DEFAULT, bench, &CANCEL) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Press SPACE to start a batch, SPACE again to cancel");
    block_on(controller.run())
}
