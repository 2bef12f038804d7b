//! Model of the device under test: a screen region the photosensor looks at.
//!
//! An injected input flips the region between dark and bright after the
//! response time. The sensor reading carries a small slow ripple so that the
//! baseline is never perfectly flat.

/// Sensor level over the dark region.
pub const DARK_LEVEL: f32 = 400.0;

/// Sensor level over the bright region.
pub const BRIGHT_LEVEL: f32 = 800.0;

/// Peak ripple amplitude in ADC counts. Well below any sensible threshold.
pub const NOISE_AMPLITUDE: f32 = 6.0;

/// Ripple frequency in rad/s.
const NOISE_FREQ: f32 = 40.0;

/// Simulated screen under the photosensor.
pub struct DeviceUnderTest {
    response_us: u64,
    jitter_us: u64,
    bright: bool,
    pending_flip_us: Option<u64>,
    triggers: u64,
}

impl DeviceUnderTest {
    pub const fn new(
        response_us: u64,
        jitter_us: u64,
    ) -> Self {
        Self {
            response_us,
            jitter_us,
            bright: false,
            pending_flip_us: None,
            triggers: 0,
        }
    }

    /// Register an input at `now_us`. Inputs arriving while a change is
    /// already scheduled are absorbed by that change.
    pub fn trigger(
        &mut self,
        now_us: u64,
    ) {
        if self.pending_flip_us.is_some() {
            return;
        }
        let spread = if self.jitter_us == 0 {
            0
        } else {
            self.triggers.wrapping_mul(7_919) % self.jitter_us
        };
        self.triggers += 1;
        self.pending_flip_us = Some(now_us + self.response_us + spread);
        log::debug!("dut: change scheduled at {} us", now_us + self.response_us + spread);
    }

    /// Sensor reading at `now_us`.
    pub fn level(
        &mut self,
        now_us: u64,
    ) -> u16 {
        if let Some(flip_at) = self.pending_flip_us
            && now_us >= flip_at
        {
            self.bright = !self.bright;
            self.pending_flip_us = None;
        }

        let base = if self.bright { BRIGHT_LEVEL } else { DARK_LEVEL };
        let t = now_us as f32 / 1_000_000.0;
        (base + fake_signal(t, -NOISE_AMPLITUDE, NOISE_AMPLITUDE, NOISE_FREQ)).round() as u16
    }

    #[inline]
    pub const fn is_bright(&self) -> bool { self.bright }
}

/// Sine wave between `min` and `max`.
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn near(
        value: u16,
        level: f32,
    ) -> bool {
        (f32::from(value) - level).abs() <= NOISE_AMPLITUDE + 1.0
    }

    #[test]
    fn test_idle_level_stays_dark() {
        let mut dut = DeviceUnderTest::new(10_000, 0);
        for t in (0..1_000_000).step_by(12_345) {
            assert!(near(dut.level(t), DARK_LEVEL));
        }
    }

    #[test]
    fn test_flip_after_response_time() {
        let mut dut = DeviceUnderTest::new(10_000, 0);
        dut.trigger(1_000);
        assert!(near(dut.level(10_999), DARK_LEVEL));
        assert!(near(dut.level(11_000), BRIGHT_LEVEL));
        assert!(dut.is_bright());
    }

    #[test]
    fn test_second_trigger_flips_back() {
        let mut dut = DeviceUnderTest::new(1_000, 0);
        dut.trigger(0);
        dut.level(1_000);
        dut.trigger(5_000);
        assert!(near(dut.level(6_000), DARK_LEVEL));
    }

    #[test]
    fn test_trigger_while_pending_is_absorbed() {
        let mut dut = DeviceUnderTest::new(1_000, 0);
        dut.trigger(0);
        dut.trigger(500);
        assert!(near(dut.level(1_000), BRIGHT_LEVEL));
        assert!(near(dut.level(2_000), BRIGHT_LEVEL));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut dut = DeviceUnderTest::new(1_000, 400);
        let mut now = 0;
        for _ in 0..20 {
            dut.trigger(now);
            let flip_at = dut.pending_flip_us.unwrap();
            assert!((now + 1_000..now + 1_400).contains(&flip_at));
            dut.level(flip_at);
            now = flip_at + 10_000;
        }
    }
}
