//! Concrete implementations of the traits defined in [`crate::traits`].
//!
//! - [`TextMeasure`] on [`TerrarumSans`]: thin wrappers over
//!   [`TerrarumSans::measure`] and the line metrics, with shaping errors
//!   logged and reported as a zero width.

use terrarum_sans_fonts::GlyphRenderer;

use crate::font::TerrarumSans;
use crate::traits::TextMeasure;

impl<R: GlyphRenderer> TextMeasure for TerrarumSans<R> {
    fn text_width(&self, text: &str) -> i32 {
        self.measure(text).unwrap_or_else(|e| {
            log::warn!("Could not measure {:?}: {}", text, e);
            0
        })
    }

    /// Delegates to [`TerrarumSans::line_height`].
    fn line_height(&self) -> i32 {
        TerrarumSans::line_height(self)
    }

    /// Delegates to [`TerrarumSans::glyph_height`].
    fn glyph_height(&self) -> i32 {
        TerrarumSans::glyph_height(self)
    }
}
