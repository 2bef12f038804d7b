//! Mouse-to-photon latency tester firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! Presents itself to the host as a USB HID mouse, injects a button press and
//! times how long it takes until the photosensor taped to the host's screen
//! sees the brightness change. Results go to the SSD1306 OLED.
//!
//! # Tasks
//!
//! - Main task: measurement controller (busy-polls the sensor, yields every poll)
//! - USB task: device state machine for the HID interface
//! - Button task: level tracking and cancellation edges
//!
//! # Button
//!
//! - Idle: start a batch
//! - During a batch (after the first valid cycle): cancel and discard the batch

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod button;
mod display;
mod hid;
mod sensor;

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::USB;
use embassy_rp::{bind_interrupts, usb};
use embassy_time::{Delay, Instant, Timer};
use m2p_latency::cancel::{CancellationSignal, InterruptController};
use m2p_latency::config::BLINK_DELAY_MS;
use m2p_latency::controller::MeasurementController;
use m2p_latency::error::FatalHardwareFault;
use m2p_latency::hal::{Bench, Clock};
use m2p_pico2::measurement_config;
use {defmt_rtt as _, panic_probe as _};

use crate::button::{LevelButton, button_task};
use crate::display::{Oled, display_i2c_config};
use crate::hid::usb_task;
use crate::sensor::AdcSensor;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    USBCTRL_IRQ => usb::InterruptHandler<USB>;
});

/// Shared between the button task (sets) and the controller (consumes).
static CANCEL: CancellationSignal = CancellationSignal::new();

/// Microsecond clock from the embassy time driver.
struct TimerClock;

impl Clock for TimerClock {
    fn now_us(&self) -> u64 { Instant::now().as_micros() }
}

/// Blink the status LED forever. Used when the tester cannot operate.
async fn halt(
    led: &mut Output<'_>,
    fault: FatalHardwareFault,
) -> ! {
    error!("Fatal: {}", fault);
    loop {
        led.set_high();
        Timer::after_millis(BLINK_DELAY_MS).await;
        led.set_low();
        Timer::after_millis(BLINK_DELAY_MS).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("m2p-latency starting...");

    let p = embassy_rp::init(Default::default());

    // On-board LED, only used for the fatal blink
    let mut led = Output::new(p.PIN_25, Level::Low);

    // Display first: without it there is no way to operate the tester
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, display_i2c_config());
    let display = match Oled::new(i2c) {
        Ok(display) => display,
        Err(fault) => halt(&mut led, fault).await,
    };
    info!("Display initialized");

    // Photosensor on ADC0
    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let channel = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let sensor = AdcSensor::new(adc, channel);

    // USB HID mouse
    let (usb, mouse) = hid::build(usb::Driver::new(p.USB, Irqs));
    spawner.must_spawn(usb_task(usb));
    info!("USB task spawned");

    // Start/cancel button (active-low with internal pull-up)
    let button = Input::new(p.PIN_15, Pull::Up);
    spawner.must_spawn(button_task(button, InterruptController::new(&CANCEL)));
    info!("Button task spawned");

    let bench = Bench {
        sensor,
        injector: mouse,
        display,
        button: LevelButton,
        clock: TimerClock,
        delay: Delay,
    };

    let config = measurement_config();
    info!(
        "Config: {} cycles, floor {} us, threshold {}",
        config.num_cycles, config.latency_floor_us, config.threshold
    );

    match MeasurementController::new(config, bench, &CANCEL) {
        Ok(mut controller) => controller.run().await,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            loop {
                Timer::after_secs(1).await;
            }
        }
    }
}
