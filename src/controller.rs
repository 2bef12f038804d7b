//! Measurement state machine.
//!
//! One [`MeasurementController`] owns the whole measurement: the batch, the
//! cycle index, the baseline and what is on screen. Nothing else mutates
//! them. The button interrupt only reaches the controller through the
//! [`CancellationSignal`], which is polled cooperatively.
//!
//! # States
//!
//! ```text
//! Idle -> Armed -> AwaitingEvent -> ValidCycle   -> Armed (next index) | BatchComplete -> Idle
//!                                -> InvalidCycle -> Armed (same index)
//!                                -> Interrupted  -> Idle
//! ```
//!
//! The event wait has no timeout: if the device under test never changes
//! brightness the loop polls forever (until cancelled). Each poll iteration
//! yields once to the executor so the USB stack keeps running.

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::cancel::CancellationSignal;
use crate::config::{Injection, MAX_CYCLES, MeasurementConfig};
use crate::error::{ConfigError, StatisticsError};
use crate::frame::DisplayFrame;
use crate::hal::{Bench, Clock, DisplayPresenter, InputInjector, SensorSampler, StartButton};
use crate::statistics::{self, Statistics};

/// Recorded latencies of one batch, in microseconds, in cycle order.
pub type Samples = Vec<u32, MAX_CYCLES>;

/// Where the controller currently is in the measurement flow.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Idle,
    Armed,
    AwaitingEvent,
    ValidCycle,
    InvalidCycle,
    Interrupted,
    BatchComplete,
}

/// One trial: arm, trigger, detect.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementCycle {
    /// Position in the batch (0-based).
    pub index: usize,
    /// Reference reading taken right before the trigger.
    pub baseline: u16,
    /// Clock value when the input was injected.
    pub start_us: u64,
    /// Raw time from injection to detection.
    pub latency_us: u32,
    /// Whether the latency cleared the internal floor.
    pub valid: bool,
}

/// Result of [`MeasurementController::run_cycle`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CycleOutcome {
    /// Sample appended; `recorded_us` is the raw latency minus the floor.
    Valid { cycle: MeasurementCycle, recorded_us: u32 },
    /// Latency below the floor. Nothing recorded, index unchanged.
    Rejected(MeasurementCycle),
    /// Cancelled by the button. Batch discarded, index reset.
    Interrupted,
}

/// Result of [`MeasurementController::run_batch`].
#[derive(Clone, PartialEq, Debug)]
pub enum BatchOutcome {
    Complete { stats: Statistics, samples: Samples },
    Interrupted,
}

/// What the panel shows; the frame is rebuilt from this on every render.
#[derive(Clone, Copy, PartialEq, Debug)]
enum View {
    Startup,
    Live {
        baseline: u16,
        measured: Option<u16>,
        index: usize,
        latency_us: Option<u32>,
    },
    Rejected {
        index: usize,
    },
    Interrupted,
    Summary(Statistics),
}

/// Drives measurement cycles and batches on a [`Bench`] of peripherals.
pub struct MeasurementController<'a, S, I, D, B, C, W> {
    config: MeasurementConfig,
    bench: Bench<S, I, D, B, C, W>,
    cancel: &'a CancellationSignal,
    batch: Samples,
    cycle_index: usize,
    phase: Phase,
    view: View,
    /// A `Press` injection is waiting for its release.
    button_held: bool,
    /// Direction of the next `Move` injection.
    move_down: bool,
}

impl<'a, S, I, D, B, C, W> MeasurementController<'a, S, I, D, B, C, W>
where
    S: SensorSampler,
    I: InputInjector,
    D: DisplayPresenter,
    B: StartButton,
    C: Clock,
    W: DelayNs,
{
    /// Validate `config` and build an idle controller.
    pub fn new(
        config: MeasurementConfig,
        bench: Bench<S, I, D, B, C, W>,
        cancel: &'a CancellationSignal,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        cancel.set_armed(false);
        cancel.clear();
        Ok(Self {
            config,
            bench,
            cancel,
            batch: Vec::new(),
            cycle_index: 0,
            phase: Phase::Idle,
            view: View::Startup,
            button_held: false,
            move_down: true,
        })
    }

    #[inline]
    pub const fn config(&self) -> &MeasurementConfig { &self.config }

    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    #[inline]
    pub const fn cycle_index(&self) -> usize { self.cycle_index }

    /// Latencies recorded so far in the current batch.
    #[inline]
    pub fn batch(&self) -> &[u32] { &self.batch }

    #[inline]
    pub const fn bench(&self) -> &Bench<S, I, D, B, C, W> { &self.bench }

    #[inline]
    pub fn bench_mut(&mut self) -> &mut Bench<S, I, D, B, C, W> { &mut self.bench }

    /// The frame for the current state. Pure: same state, same frame.
    pub fn frame(&self) -> DisplayFrame {
        let num_cycles = self.config.num_cycles;
        match self.view {
            View::Startup => DisplayFrame::startup(),
            View::Live {
                baseline,
                measured,
                index,
                latency_us,
            } => DisplayFrame::measurement(baseline, measured, index, num_cycles, latency_us),
            View::Rejected { index } => DisplayFrame::rejected(index, num_cycles),
            View::Interrupted => DisplayFrame::interrupted(),
            View::Summary(stats) => DisplayFrame::summary(num_cycles, &stats),
        }
    }

    /// Render the title banner and start prompt.
    pub fn show_startup(&mut self) { self.show(View::Startup); }

    /// Measure forever: wait for the button, run a batch, repeat.
    pub async fn run(&mut self) -> ! {
        self.show_startup();
        loop {
            self.wait_for_start().await;
            match self.run_batch().await {
                Ok(BatchOutcome::Complete { stats, .. }) => {
                    info!("batch complete: mean {} ms, stddev {} ms", stats.mean_ms, stats.stddev_ms);
                }
                Ok(BatchOutcome::Interrupted) => {}
                Err(e) => error!("batch summary failed: {}", e),
            }
        }
    }

    /// Idle until the start button reads as pressed. No debounce.
    pub async fn wait_for_start(&mut self) {
        self.phase = Phase::Idle;
        while !self.bench.button.is_pressed() {
            yield_now().await;
        }
        debug!("start requested");
    }

    /// Run cycles until `num_cycles` valid samples are recorded or the batch is cancelled.
    pub async fn run_batch(&mut self) -> Result<BatchOutcome, StatisticsError> {
        self.reset_batch();
        self.cancel.clear();
        info!("batch started: {} cycles", self.config.num_cycles);
        self.bench.injector.begin().await;

        while self.batch.len() < self.config.num_cycles {
            if let CycleOutcome::Interrupted = self.run_cycle().await {
                self.bench.injector.end().await;
                self.bench.delay.delay_ms(self.config.result_hold_ms).await;
                self.phase = Phase::Idle;
                self.show(View::Startup);
                return Ok(BatchOutcome::Interrupted);
            }
        }

        self.bench.injector.end().await;
        self.phase = Phase::BatchComplete;

        let samples = core::mem::take(&mut self.batch);
        self.reset_batch();
        let stats = statistics::summarize(&samples)?;
        self.show(View::Summary(stats));
        self.phase = Phase::Idle;

        Ok(BatchOutcome::Complete { stats, samples })
    }

    /// Run one cycle at the current index.
    ///
    /// A valid sample that no longer fits in the batch is reported as
    /// [`CycleOutcome::Rejected`] and the index does not advance.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let index = self.cycle_index;

        // Two-sample protocol: the first read lets the analog input settle,
        // the second one is the reference.
        self.phase = Phase::Armed;
        let settling = self.bench.sensor.read().await;
        self.show(View::Live {
            baseline: settling,
            measured: None,
            index,
            latency_us: None,
        });
        self.bench.delay.delay_ms(self.config.settle_ms).await;
        let baseline = self.bench.sensor.read().await;
        debug!("cycle {} armed, baseline {}", index + 1, baseline);

        let mut cycle = MeasurementCycle {
            index,
            baseline,
            start_us: 0,
            latency_us: 0,
            valid: false,
        };

        self.phase = Phase::AwaitingEvent;
        cycle.start_us = self.bench.clock.now_us();
        self.inject().await;

        let reading = loop {
            if self.take_cancellation() {
                return self.interrupt().await;
            }
            let reading = self.bench.sensor.read().await;
            if self.config.threshold.is_crossed(baseline, reading) {
                break reading;
            }
            yield_now().await;
        };

        let elapsed = self.bench.clock.now_us().saturating_sub(cycle.start_us);
        cycle.latency_us = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.release_held().await;

        if cycle.latency_us < self.config.latency_floor_us {
            self.phase = Phase::InvalidCycle;
            warn!(
                "cycle {}: implausible latency {} us (floor {} us), repeating",
                index + 1,
                cycle.latency_us,
                self.config.latency_floor_us
            );
            self.show(View::Rejected { index });
            self.bench.delay.delay_ms(self.config.result_hold_ms).await;
            return CycleOutcome::Rejected(cycle);
        }

        let recorded_us = cycle.latency_us - self.config.latency_floor_us;
        // Only reachable when cycles are driven past the batch without run_batch.
        if self.batch.push(recorded_us).is_err() {
            self.phase = Phase::InvalidCycle;
            error!("cycle {}: batch full ({} samples), sample dropped", index + 1, MAX_CYCLES);
            return CycleOutcome::Rejected(cycle);
        }
        cycle.valid = true;
        self.phase = Phase::ValidCycle;
        self.cycle_index += 1;
        self.cancel.set_armed(true);

        info!(
            "cycle {}/{}: {} us (raw {} us, reading {})",
            index + 1,
            self.config.num_cycles,
            recorded_us,
            cycle.latency_us,
            reading
        );
        self.show(View::Live {
            baseline,
            measured: Some(reading),
            index,
            latency_us: Some(recorded_us),
        });
        self.bench.delay.delay_ms(self.config.result_hold_ms).await;

        CycleOutcome::Valid { cycle, recorded_us }
    }

    fn show(
        &mut self,
        view: View,
    ) {
        self.view = view;
        let frame = self.frame();
        self.bench.display.render(&frame);
    }

    fn reset_batch(&mut self) {
        self.batch.clear();
        self.cycle_index = 0;
        self.cancel.set_armed(false);
    }

    /// Consume the cancellation flag. A cancellation at index zero is dropped.
    fn take_cancellation(&mut self) -> bool {
        if !self.cancel.take() {
            return false;
        }
        if self.cycle_index == 0 {
            debug!("cancellation ignored, no cycle completed yet");
            return false;
        }
        true
    }

    async fn interrupt(&mut self) -> CycleOutcome {
        self.phase = Phase::Interrupted;
        self.release_held().await;
        let discarded = self.batch.len();
        self.reset_batch();
        warn!("batch interrupted, {} samples discarded", discarded);
        self.show(View::Interrupted);
        CycleOutcome::Interrupted
    }

    async fn inject(&mut self) {
        match self.config.injection {
            Injection::Press => {
                self.bench.injector.press().await;
                self.button_held = true;
            }
            Injection::Click => self.bench.injector.click().await,
            Injection::Move { step } => {
                let dy = if self.move_down { step } else { step.saturating_neg() };
                self.move_down = !self.move_down;
                self.bench.injector.move_by(0, dy).await;
            }
        }
    }

    async fn release_held(&mut self) {
        if self.button_held {
            self.bench.injector.release().await;
            self.button_held = false;
        }
    }
}

// =============================================================================
// Test Doubles
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use embedded_hal_async::delay::DelayNs;

    use crate::cancel::{CancellationSignal, InterruptController};
    use crate::frame::DisplayFrame;
    use crate::hal::{Bench, Clock, DisplayPresenter, InputInjector, SensorSampler, StartButton};

    pub fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

    /// One scripted sensor read.
    #[derive(Clone, Copy, Debug)]
    pub enum Sample {
        Level(u16),
        /// The button's falling edge fires while this read is in progress.
        PressDuring(u16),
    }

    pub struct ScriptedSensor<'a> {
        script: VecDeque<Sample>,
        irq: InterruptController<'a>,
    }

    impl ScriptedSensor<'_> {
        pub fn remaining(&self) -> usize { self.script.len() }
    }

    impl SensorSampler for ScriptedSensor<'_> {
        async fn read(&mut self) -> u16 {
            match self.script.pop_front().expect("sensor script exhausted") {
                Sample::Level(value) => value,
                Sample::PressDuring(value) => {
                    self.irq.on_falling_edge();
                    value
                }
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum Action {
        Begin,
        End,
        Press,
        Release,
        Click,
        Move(i8, i8),
    }

    #[derive(Default)]
    pub struct RecordingInjector {
        pub actions: Vec<Action>,
    }

    impl InputInjector for RecordingInjector {
        async fn begin(&mut self) { self.actions.push(Action::Begin); }

        async fn end(&mut self) { self.actions.push(Action::End); }

        async fn press(&mut self) { self.actions.push(Action::Press); }

        async fn release(&mut self) { self.actions.push(Action::Release); }

        async fn click(&mut self) { self.actions.push(Action::Click); }

        async fn move_by(
            &mut self,
            dx: i8,
            dy: i8,
        ) {
            self.actions.push(Action::Move(dx, dy));
        }
    }

    #[derive(Default)]
    pub struct RecordingDisplay {
        pub frames: Vec<DisplayFrame>,
    }

    impl DisplayPresenter for RecordingDisplay {
        fn render(
            &mut self,
            frame: &DisplayFrame,
        ) {
            self.frames.push(frame.clone());
        }
    }

    /// Reads as released `idle_polls` times, then pressed.
    #[derive(Default)]
    pub struct ScriptedButton {
        pub idle_polls: usize,
        pub polls: usize,
    }

    impl StartButton for ScriptedButton {
        fn is_pressed(&mut self) -> bool {
            self.polls += 1;
            self.polls > self.idle_polls
        }
    }

    /// Returns scripted timestamps, one per call.
    pub struct ScriptedClock {
        times: RefCell<VecDeque<u64>>,
    }

    impl ScriptedClock {
        pub fn remaining(&self) -> usize { self.times.borrow().len() }
    }

    impl Clock for ScriptedClock {
        fn now_us(&self) -> u64 { self.times.borrow_mut().pop_front().expect("clock script exhausted") }
    }

    /// Accumulates requested delays instead of sleeping.
    #[derive(Default)]
    pub struct NoDelay {
        pub total_ns: u64,
    }

    impl DelayNs for NoDelay {
        async fn delay_ns(
            &mut self,
            ns: u32,
        ) {
            self.total_ns += u64::from(ns);
        }
    }

    pub type TestBench<'a> =
        Bench<ScriptedSensor<'a>, RecordingInjector, RecordingDisplay, ScriptedButton, ScriptedClock, NoDelay>;

    pub fn bench<'a>(
        signal: &'a CancellationSignal,
        readings: impl IntoIterator<Item = Sample>,
        times: impl IntoIterator<Item = u64>,
    ) -> TestBench<'a> {
        Bench {
            sensor: ScriptedSensor {
                script: readings.into_iter().collect(),
                irq: InterruptController::new(signal),
            },
            injector: RecordingInjector::default(),
            display: RecordingDisplay::default(),
            button: ScriptedButton::default(),
            clock: ScriptedClock {
                times: RefCell::new(times.into_iter().collect()),
            },
            delay: NoDelay::default(),
        }
    }

    /// Readings for one cycle: settling read, reference read, then the polls.
    pub fn cycle(
        baseline: u16,
        polls: &[u16],
    ) -> Vec<Sample> {
        let mut out = vec![Sample::Level(baseline), Sample::Level(baseline)];
        out.extend(polls.iter().map(|&p| Sample::Level(p)));
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
