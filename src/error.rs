//! Error types.
//!
//! Only a few things can fail in this system. Implausible samples and user
//! cancellation are ordinary control flow ([`CycleOutcome`](crate::controller::CycleOutcome),
//! [`BatchOutcome`](crate::controller::BatchOutcome)), not errors.

use core::fmt;

use crate::config::MAX_CYCLES;

/// Invalid measurement configuration, detected before any measurement starts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A batch needs at least one cycle.
    ZeroCycles,
    /// Batch larger than the fixed sample storage.
    TooManyCycles(usize),
    /// Threshold of zero units or a percentage outside 1..=100.
    InvalidThreshold,
    /// Move injection with a zero step never moves the pointer.
    ZeroMoveStep,
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ZeroCycles => f.write_str("batch size must be at least 1"),
            Self::TooManyCycles(n) => write!(f, "batch size {n} exceeds the maximum of {MAX_CYCLES}"),
            Self::InvalidThreshold => f.write_str("threshold must be non-zero (percentage at most 100)"),
            Self::ZeroMoveStep => f.write_str("move injection step must be non-zero"),
        }
    }
}

/// Statistics requested over an empty batch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatisticsError {
    EmptyBatch,
}

impl fmt::Display for StatisticsError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::EmptyBatch => f.write_str("no samples to summarize"),
        }
    }
}

/// A mandatory peripheral failed to come up. The device must halt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalHardwareFault {
    /// Display controller did not acknowledge initialization.
    DisplayInit,
}

impl fmt::Display for FatalHardwareFault {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::DisplayInit => f.write_str("display initialization failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::ZeroCycles.to_string(), "batch size must be at least 1");
        assert_eq!(
            ConfigError::TooManyCycles(65).to_string(),
            "batch size 65 exceeds the maximum of 64"
        );
    }

    #[test]
    fn test_fault_messages() {
        assert_eq!(FatalHardwareFault::DisplayInit.to_string(), "display initialization failed");
        assert_eq!(StatisticsError::EmptyBatch.to_string(), "no samples to summarize");
    }
}
