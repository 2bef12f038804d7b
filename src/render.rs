//! Draws a [`DisplayFrame`] onto any monochrome `embedded-graphics` target.
//!
//! Used by the firmware (SSD1306 buffer) and by the simulator
//! (`SimulatorDisplay<BinaryColor>`). Every call clears the target first, so
//! the result depends only on the frame.
//!
//! # Layout (128x64)
//!
//! ```text
//! y=0   header            (small, left or centered)
//! y=8   body[0]           (small)
//! y=16  body[1]           (small)
//! y=28  [glyph] value     (large) | prompt (small)
//! y=50  detail            (small)
//! ```

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use crate::config::{LOWER_CURSOR_Y, SCREEN_WIDTH};
use crate::frame::{Align, DisplayFrame, Lower};
use crate::styles::{GLYPH_FONT, GLYPH_STYLE, SMALL_FONT, SMALL_STYLE, TOP_CENTER, TOP_LEFT, VALUE_FONT, VALUE_STYLE};

/// Vertical distance between small-font lines.
pub const SMALL_LINE_HEIGHT: i32 = SMALL_FONT.character_size.height as i32;

/// Top edge of the detail line, directly under the large value.
pub const DETAIL_Y: i32 = LOWER_CURSOR_Y + VALUE_FONT.character_size.height as i32;

/// Horizontal space taken by the glyph in front of the value.
const GLYPH_ADVANCE: i32 = GLYPH_FONT.character_size.width as i32 + 2;

const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

const _: () = assert!(DETAIL_Y + SMALL_LINE_HEIGHT <= crate::config::SCREEN_HEIGHT as i32);

/// Clear `target` and draw `frame` onto it.
pub fn draw_frame<D>(
    target: &mut D,
    frame: &DisplayFrame,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let (header_pos, header_style) = match frame.header_align {
        Align::Left => (Point::zero(), TOP_LEFT),
        Align::Center => (Point::new(CENTER_X, 0), TOP_CENTER),
    };
    Text::with_text_style(frame.header.as_str(), header_pos, SMALL_STYLE, header_style).draw(target)?;

    for (row, line) in frame.body.iter().enumerate() {
        let y = SMALL_LINE_HEIGHT * (row as i32 + 1);
        Text::with_text_style(line.as_str(), Point::new(0, y), SMALL_STYLE, TOP_LEFT).draw(target)?;
    }

    match &frame.lower {
        Lower::Empty => {}
        Lower::Prompt(line) => {
            Text::with_text_style(line.as_str(), Point::new(0, LOWER_CURSOR_Y), SMALL_STYLE, TOP_LEFT).draw(target)?;
        }
        Lower::Value { glyph, text } => {
            let mut x = 0;
            if let Some(glyph) = glyph {
                let mut buf = [0u8; 4];
                let symbol = glyph.symbol().encode_utf8(&mut buf);
                Text::with_text_style(symbol, Point::new(0, LOWER_CURSOR_Y), GLYPH_STYLE, TOP_LEFT).draw(target)?;
                x = GLYPH_ADVANCE;
            }
            Text::with_text_style(text.as_str(), Point::new(x, LOWER_CURSOR_Y), VALUE_STYLE, TOP_LEFT).draw(target)?;
        }
    }

    if let Some(detail) = &frame.detail {
        Text::with_text_style(detail.as_str(), Point::new(0, DETAIL_Y), SMALL_STYLE, TOP_LEFT).draw(target)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;
    use crate::config::SCREEN_HEIGHT;
    use crate::statistics::Statistics;

    const W: usize = SCREEN_WIDTH as usize;
    const H: usize = SCREEN_HEIGHT as usize;

    /// 128x64 framebuffer that silently drops out-of-bounds pixels like a real panel.
    #[derive(Clone, PartialEq)]
    struct TestPanel {
        pixels: [[bool; W]; H],
    }

    impl TestPanel {
        fn new() -> Self { Self { pixels: [[false; W]; H] } }

        fn lit_in_rows(
            &self,
            rows: core::ops::Range<usize>,
        ) -> usize {
            self.pixels[rows].iter().flatten().filter(|&&p| p).count()
        }
    }

    impl OriginDimensions for TestPanel {
        fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
    }

    impl DrawTarget for TestPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..W as i32).contains(&point.x) && (0..H as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    fn rendered(frame: &DisplayFrame) -> TestPanel {
        let mut panel = TestPanel::new();
        draw_frame(&mut panel, frame).unwrap();
        panel
    }

    #[test]
    fn test_empty_frame_is_blank() {
        let panel = rendered(&DisplayFrame::default());
        assert_eq!(panel.lit_in_rows(0..H), 0);
    }

    #[test]
    fn test_startup_layout() {
        let panel = rendered(&DisplayFrame::startup());
        assert!(panel.lit_in_rows(0..8) > 0, "title missing");
        assert_eq!(panel.lit_in_rows(8..LOWER_CURSOR_Y as usize), 0);
        assert!(panel.lit_in_rows(LOWER_CURSOR_Y as usize..LOWER_CURSOR_Y as usize + 8) > 0, "prompt missing");
    }

    #[test]
    fn test_centered_header_leaves_left_edge_dark() {
        let panel = rendered(&DisplayFrame::startup());
        let left_columns_lit = panel.pixels[0..8].iter().flat_map(|row| &row[0..10]).filter(|&&p| p).count();
        assert_eq!(left_columns_lit, 0);
    }

    #[test]
    fn test_summary_uses_all_regions() {
        let stats = Statistics {
            mean_ms: 1.25,
            stddev_ms: 0.11,
        };
        let panel = rendered(&DisplayFrame::summary(10, &stats));
        assert!(panel.lit_in_rows(0..8) > 0);
        assert!(panel.lit_in_rows(8..24) > 0);
        assert!(panel.lit_in_rows(LOWER_CURSOR_Y as usize..DETAIL_Y as usize) > 0);
        assert!(panel.lit_in_rows(DETAIL_Y as usize..H) > 0);
    }

    #[test]
    fn test_redraw_clears_previous_content() {
        let mut panel = TestPanel::new();
        let stats = Statistics {
            mean_ms: 99.9,
            stddev_ms: 9.9,
        };
        draw_frame(&mut panel, &DisplayFrame::summary(10, &stats)).unwrap();
        draw_frame(&mut panel, &DisplayFrame::interrupted()).unwrap();
        assert!(panel == rendered(&DisplayFrame::interrupted()));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let frame = DisplayFrame::measurement(512, Some(300), 3, 10, Some(12_345));
        assert!(rendered(&frame) == rendered(&frame));
    }
}
