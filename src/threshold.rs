//! Brightness threshold detection.
//!
//! A reading counts as "the screen changed" when its absolute distance from the
//! baseline is strictly greater than the configured threshold. Two modes are
//! supported because both have been used on real sensors:
//!
//! - [`ThresholdMode::Absolute`]: fixed number of ADC counts. Suits photodiodes
//!   whose noise floor is a roughly constant number of counts.
//! - [`ThresholdMode::PercentOfBaseline`]: fraction of the baseline reading.
//!   Suits light-dependent resistors whose response scales with brightness.
//!
//! All comparisons are done in integer arithmetic so that "equal to the
//! threshold" is exact and never triggers.

/// How the brightness threshold is expressed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdMode {
    /// Fixed delta in sensor units.
    Absolute(u16),
    /// Delta as a whole-number percentage of the baseline (1..=100).
    PercentOfBaseline(u8),
}

impl ThresholdMode {
    /// Absolute distance between a reading and the baseline.
    #[inline]
    pub const fn delta(
        baseline: u16,
        reading: u16,
    ) -> u16 {
        reading.abs_diff(baseline)
    }

    /// Returns true if `reading` departs from `baseline` by strictly more than the threshold.
    pub const fn is_crossed(
        self,
        baseline: u16,
        reading: u16,
    ) -> bool {
        let delta = Self::delta(baseline, reading) as u32;
        match self {
            Self::Absolute(units) => delta > units as u32,
            // delta > baseline * pct / 100, kept exact by scaling both sides
            Self::PercentOfBaseline(pct) => delta * 100 > baseline as u32 * pct as u32,
        }
    }

    /// Threshold magnitude for the given baseline, in sensor units (rounded down).
    ///
    /// Informational only; [`is_crossed`](Self::is_crossed) does the exact comparison.
    pub const fn limit(
        self,
        baseline: u16,
    ) -> u32 {
        match self {
            Self::Absolute(units) => units as u32,
            Self::PercentOfBaseline(pct) => baseline as u32 * pct as u32 / 100,
        }
    }

    /// Whether the threshold can ever be crossed meaningfully.
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Absolute(units) => units > 0,
            Self::PercentOfBaseline(pct) => pct > 0 && pct <= 100,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
