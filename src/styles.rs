//! Pre-computed static text styles for the monochrome panel.
//!
//! Styles are `const` so they live in read-only data and no style objects are
//! built per frame. The small font is ISO 8859-1 so that the `»`, `«`, `µ` and
//! `±` glyphs render; the large value font is ProFont (digits and `ms` only).

use embedded_graphics::mono_font::iso_8859_1::{FONT_5X8, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_18_POINT;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, positioned by the top edge of the glyph cell.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Centered on the given x, positioned by the top edge of the glyph cell.
pub const TOP_CENTER: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Header, body, prompt and detail lines (5x8 pixels).
pub const SMALL_FONT: &MonoFont = &FONT_5X8;

/// Glyph in front of the large value (10x20 pixels, Latin-1).
pub const GLYPH_FONT: &MonoFont = &FONT_10X20;

/// Large millisecond value.
pub const VALUE_FONT: &MonoFont = &PROFONT_18_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

pub const SMALL_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);

pub const GLYPH_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

pub const VALUE_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&PROFONT_18_POINT, BinaryColor::On);
