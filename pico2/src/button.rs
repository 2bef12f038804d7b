//! Start/cancel button on GPIO15 (active-low, internal pull-up).
//!
//! One task owns the pin. It publishes the level for the controller's start
//! poll and forwards falling edges to the cancellation handler. There is no
//! debounce: bounces collapse into the single pending flag.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_rp::gpio::Input;
use m2p_latency::cancel::InterruptController;
use m2p_latency::hal::StartButton;

/// Last observed level (true = pressed).
static BUTTON_DOWN: AtomicBool = AtomicBool::new(false);

#[embassy_executor::task]
pub async fn button_task(
    mut input: Input<'static>,
    irq: InterruptController<'static>,
) -> ! {
    BUTTON_DOWN.store(input.is_low(), Ordering::Release);

    loop {
        input.wait_for_any_edge().await;
        let down = input.is_low();
        let was_down = BUTTON_DOWN.swap(down, Ordering::AcqRel);
        if down && !was_down {
            irq.on_falling_edge();
        }
    }
}

/// Reads the level published by [`button_task`].
pub struct LevelButton;

impl StartButton for LevelButton {
    fn is_pressed(&mut self) -> bool { BUTTON_DOWN.load(Ordering::Acquire) }
}
