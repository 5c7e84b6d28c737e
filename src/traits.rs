//! Host-facing trait definitions.
//!
//! The shaping engine only produces positions and widths. Hosts that expect
//! a text-measurement interface get one through these traits, implemented in
//! [`crate::traits_impl`] on top of the font object; the engine crates never
//! depend on them.

pub use terrarum_sans_fonts::GlyphRenderer;

// ── TextMeasure ──────────────────────────────────────────────────────────────

/// Text measurement as a layout host consumes it.
///
/// All values are in scaled pixels.
pub trait TextMeasure {
    /// Advance of `text` on one line.
    ///
    /// Hosts cannot handle a failed measurement, so implementations report
    /// 0 for text that could not be shaped.
    fn text_width(&self, text: &str) -> i32;

    /// Baseline-to-baseline distance.
    fn line_height(&self) -> i32;

    /// Height of the glyph cell, without line spacing.
    fn glyph_height(&self) -> i32 {
        self.line_height()
    }
}
