//! Display frame descriptions.
//!
//! A [`DisplayFrame`] says *what* is on screen, independent of the panel. The
//! controller derives one from its state on every render and hands it to a
//! [`DisplayPresenter`](crate::hal::DisplayPresenter); [`render`](crate::render)
//! turns it into pixels.
//!
//! # Screen Regions
//!
//! | Region | Position | Font |
//! |--------|----------|------|
//! | `header` | y = 0 | small |
//! | `body` | y = 8, 16 | small |
//! | `lower` | y = [`LOWER_CURSOR_Y`](crate::config::LOWER_CURSOR_Y) | large value or small prompt |
//! | `detail` | below the large value | small |

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::config::LINE_LEN;
use crate::statistics::Statistics;

/// Number of body lines between header and lower region.
pub const BODY_LINES: usize = 2;

/// One line of text on the panel.
pub type Line = String<LINE_LEN>;

/// Decorative symbols. Only their meaning is fixed; the rendered shape is cosmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    TitleOpen,
    TitleClose,
    /// Marks the reading that crossed the threshold.
    NewReading,
    /// Marks the batch mean.
    Mean,
    /// Marks the standard deviation.
    Spread,
}

impl Glyph {
    /// Latin-1 character used to draw the glyph.
    pub const fn symbol(self) -> char {
        match self {
            Self::TitleOpen => '»',
            Self::TitleClose => '«',
            Self::NewReading => '>',
            Self::Mean => 'µ',
            Self::Spread => '±',
        }
    }
}

/// Horizontal alignment of the header line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Content of the lower half of the screen.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum Lower {
    #[default]
    Empty,
    /// Small-font message (prompts, status).
    Prompt(Line),
    /// Large-font value with an optional leading glyph.
    Value { glyph: Option<Glyph>, text: Line },
}

/// Everything that is shown on the panel at one moment.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DisplayFrame {
    pub header: Line,
    pub header_align: Align,
    pub body: Vec<Line, BODY_LINES>,
    pub lower: Lower,
    pub detail: Option<Line>,
}

impl DisplayFrame {
    /// Title banner and start prompt.
    pub fn startup() -> Self {
        Self {
            header: line(format_args!(
                "{} m2p-latency {}",
                Glyph::TitleOpen.symbol(),
                Glyph::TitleClose.symbol()
            )),
            header_align: Align::Center,
            lower: Lower::Prompt(text("Press button to start")),
            ..Self::default()
        }
    }

    /// Live cycle view. `measured` and `latency_us` are filled in once the change was detected.
    pub fn measurement(
        baseline: u16,
        measured: Option<u16>,
        index: usize,
        num_cycles: usize,
        latency_us: Option<u32>,
    ) -> Self {
        let header = match measured {
            Some(reading) => line(format_args!(
                "base: {baseline} {} new: {reading}",
                Glyph::NewReading.symbol()
            )),
            None => line(format_args!("base: {baseline}")),
        };

        let mut body = Vec::new();
        body.push(progress(index, num_cycles)).ok();

        let lower = match latency_us {
            Some(us) => Lower::Value {
                glyph: None,
                text: format_ms(us_to_ms(us)),
            },
            None => Lower::Empty,
        };

        Self {
            header,
            body,
            lower,
            ..Self::default()
        }
    }

    /// The detected change came too early to be real; the cycle is repeated.
    pub fn rejected(
        index: usize,
        num_cycles: usize,
    ) -> Self {
        let mut body = Vec::new();
        body.push(text("repeating cycle...")).ok();
        body.push(progress(index, num_cycles)).ok();
        Self {
            header: text("implausible value!"),
            body,
            ..Self::default()
        }
    }

    /// Transient message after a mid-batch cancellation.
    pub fn interrupted() -> Self {
        Self {
            header: text("Interrupted."),
            header_align: Align::Center,
            lower: Lower::Prompt(text("Restarting...")),
            ..Self::default()
        }
    }

    /// Batch result.
    pub fn summary(
        num_cycles: usize,
        stats: &Statistics,
    ) -> Self {
        let mut body = Vec::new();
        body.push(text("to restart.")).ok();
        body.push(line(format_args!("over {num_cycles} cycles:"))).ok();
        Self {
            header: text("Press button"),
            header_align: Align::Left,
            body,
            lower: Lower::Value {
                glyph: Some(Glyph::Mean),
                text: format_ms(stats.mean_ms),
            },
            detail: Some(line(format_args!("{} {:.2}", Glyph::Spread.symbol(), stats.stddev_ms))),
        }
    }
}

/// Number of decimals so that a millisecond value fills about five characters.
pub fn ms_decimals(ms: f64) -> usize {
    let mut integer = if ms > 0.0 { ms as u64 } else { 0 };
    let mut digits = 1;
    while integer >= 10 {
        integer /= 10;
        digits += 1;
    }
    5usize.saturating_sub(digits).min(4)
}

/// Format milliseconds as `"<value> ms"` with [`ms_decimals`] precision.
pub fn format_ms(ms: f64) -> Line { line(format_args!("{:.*} ms", ms_decimals(ms), ms)) }

#[inline]
fn us_to_ms(us: u32) -> f64 { f64::from(us) / 1000.0 }

fn progress(
    index: usize,
    num_cycles: usize,
) -> Line {
    line(format_args!("{} / {}", index + 1, num_cycles))
}

/// Build a line from format arguments, truncating at [`LINE_LEN`].
fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    let _ = out.write_fmt(args);
    out
}

fn text(s: &str) -> Line { line(format_args!("{s}")) }

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_frame() {
        let frame = DisplayFrame::startup();
        assert_eq!(frame.header.as_str(), "» m2p-latency «");
        assert_eq!(frame.header_align, Align::Center);
        assert_eq!(frame.lower, Lower::Prompt(text("Press button to start")));
        assert!(frame.body.is_empty());
        assert!(frame.detail.is_none());
    }

    #[test]
    fn test_baseline_frame_before_detection() {
        let frame = DisplayFrame::measurement(512, None, 0, 10, None);
        assert_eq!(frame.header.as_str(), "base: 512");
        assert_eq!(frame.body[0].as_str(), "1 / 10");
        assert_eq!(frame.lower, Lower::Empty);
    }

    #[test]
    fn test_measurement_frame_after_detection() {
        let frame = DisplayFrame::measurement(512, Some(300), 4, 10, Some(16_667));
        assert_eq!(frame.header.as_str(), "base: 512 > new: 300");
        assert_eq!(frame.body[0].as_str(), "5 / 10");
        match frame.lower {
            Lower::Value { glyph, ref text } => {
                assert_eq!(glyph, None);
                assert_eq!(text.as_str(), "16.667 ms");
            }
            ref other => panic!("unexpected lower region: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_frame() {
        let frame = DisplayFrame::rejected(1, 3);
        assert_eq!(frame.header.as_str(), "implausible value!");
        assert_eq!(frame.body[0].as_str(), "repeating cycle...");
        assert_eq!(frame.body[1].as_str(), "2 / 3");
    }

    #[test]
    fn test_interrupted_frame() {
        let frame = DisplayFrame::interrupted();
        assert_eq!(frame.header.as_str(), "Interrupted.");
        assert_eq!(frame.lower, Lower::Prompt(text("Restarting...")));
    }

    #[test]
    fn test_summary_frame() {
        let stats = Statistics {
            mean_ms: 1.25,
            stddev_ms: 0.111_803,
        };
        let frame = DisplayFrame::summary(5, &stats);
        assert_eq!(frame.header.as_str(), "Press button");
        assert_eq!(frame.body[0].as_str(), "to restart.");
        assert_eq!(frame.body[1].as_str(), "over 5 cycles:");
        assert_eq!(
            frame.lower,
            Lower::Value {
                glyph: Some(Glyph::Mean),
                text: text("1.2500 ms"),
            }
        );
        assert_eq!(frame.detail.as_ref().map(Line::as_str), Some("± 0.11"));
    }

    #[test]
    fn test_same_input_same_frame() {
        let a = DisplayFrame::measurement(700, Some(200), 2, 10, Some(42_000));
        let b = DisplayFrame::measurement(700, Some(200), 2, 10, Some(42_000));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ms_decimals() {
        assert_eq!(ms_decimals(0.038), 4);
        assert_eq!(ms_decimals(1.25), 4);
        assert_eq!(ms_decimals(16.7), 3);
        assert_eq!(ms_decimals(123.4), 2);
        assert_eq!(ms_decimals(1234.5), 1);
        assert_eq!(ms_decimals(12_345.0), 0);
        assert_eq!(ms_decimals(1_234_567.0), 0);
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0.188).as_str(), "0.1880 ms");
        assert_eq!(format_ms(123.456).as_str(), "123.46 ms");
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let frame = DisplayFrame::measurement(u16::MAX, Some(u16::MAX), usize::MAX - 1, usize::MAX, Some(u32::MAX));
        assert!(frame.header.len() <= LINE_LEN);
        assert!(frame.body[0].len() <= LINE_LEN);
    }
}
