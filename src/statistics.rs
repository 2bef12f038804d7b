//! Batch statistics: mean and sample standard deviation of latency samples.
//!
//! Samples are stored in microseconds as integers and summarized in
//! milliseconds as `f64`. The computation is a plain two-pass reduction over
//! the stored slice, so the result depends only on the recorded samples and
//! never on how they were accumulated.

use crate::error::StatisticsError;

/// Summary of one completed batch.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Arithmetic mean latency in milliseconds.
    pub mean_ms: f64,
    /// Sample standard deviation (N-1 denominator) in milliseconds; 0 for a single sample.
    pub stddev_ms: f64,
}

/// Reduce a batch of latency samples (µs) to mean and sample standard deviation (ms).
pub fn summarize(samples_us: &[u32]) -> Result<Statistics, StatisticsError> {
    if samples_us.is_empty() {
        return Err(StatisticsError::EmptyBatch);
    }

    let n = samples_us.len() as f64;

    let sum: f64 = samples_us.iter().map(|&s| f64::from(s)).sum();
    let mean_us = sum / n;

    let stddev_us = if samples_us.len() < 2 {
        0.0
    } else {
        let sum_sq: f64 = samples_us
            .iter()
            .map(|&s| {
                let d = f64::from(s) - mean_us;
                d * d
            })
            .sum();
        libm::sqrt(sum_sq / (n - 1.0))
    };

    Ok(Statistics {
        mean_ms: mean_us / 1000.0,
        stddev_ms: stddev_us / 1000.0,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// Single-pass reference (Welford) used to cross-check the two-pass result.
    fn welford(samples_us: &[u32]) -> (f64, f64) {
        let mut count = 0.0f64;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        for &s in samples_us {
            count += 1.0;
            let x = f64::from(s);
            let delta = x - mean;
            mean += delta / count;
            m2 += delta * (x - mean);
        }
        let var = if count > 1.0 { m2 / (count - 1.0) } else { 0.0 };
        (mean / 1000.0, var.sqrt() / 1000.0)
    }

    #[test]
    fn test_reference_batch() {
        let stats = summarize(&[1200, 1300, 1250, 1400, 1100]).unwrap();
        assert!((stats.mean_ms - 1.25).abs() < EPS);
        // squared deviations sum to 50000 us^2, / (N-1) = 12500
        assert!((stats.stddev_ms - 0.111_803_398_874_989_5).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_has_zero_stddev() {
        let stats = summarize(&[4321]).unwrap();
        assert!((stats.mean_ms - 4.321).abs() < EPS);
        assert_eq!(stats.stddev_ms, 0.0);
    }

    #[test]
    fn test_empty_batch_is_error() {
        assert_eq!(summarize(&[]), Err(StatisticsError::EmptyBatch));
    }

    #[test]
    fn test_identical_samples() {
        let stats = summarize(&[800; 10]).unwrap();
        assert!((stats.mean_ms - 0.8).abs() < EPS);
        assert!(stats.stddev_ms.abs() < EPS);
    }

    #[test]
    fn test_order_independent() {
        let a = summarize(&[1200, 1300, 1250, 1400, 1100]).unwrap();
        let b = summarize(&[1400, 1100, 1250, 1200, 1300]).unwrap();
        assert!((a.mean_ms - b.mean_ms).abs() < EPS);
        assert!((a.stddev_ms - b.stddev_ms).abs() < EPS);
    }

    #[test]
    fn test_matches_welford() {
        let batches: [&[u32]; 4] = [
            &[1200, 1300, 1250, 1400, 1100],
            &[38, 188, 88],
            &[16_000, 16_700, 33_300, 15_900, 17_100, 16_400],
            &[u32::MAX, u32::MAX - 1, 1],
        ];
        for batch in batches {
            let stats = summarize(batch).unwrap();
            let (mean, sd) = welford(batch);
            assert!((stats.mean_ms - mean).abs() < 1e-6, "mean mismatch for {batch:?}");
            assert!((stats.stddev_ms - sd).abs() < 1e-6, "stddev mismatch for {batch:?}");
        }
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let stats = summarize(&[u32::MAX, u32::MAX]).unwrap();
        assert!((stats.mean_ms - f64::from(u32::MAX) / 1000.0).abs() < 1e-6);
        assert_eq!(stats.stddev_ms, 0.0);
    }
}
