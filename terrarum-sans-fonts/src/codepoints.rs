//! Reserved codepoints the shaper interprets instead of drawing.
//!
//! Everything in the U+FFFA0..=U+FFFFF block and the two colour blocks is
//! zero-width, never becomes a base glyph and is placed at the current pen
//! position.

use std::ops::RangeInclusive;

use terrarum_sans_config::CharsetOverride;

/// Synthetic zero-width codepoint bracketing every normalised sequence.
pub const SENTINEL: u32 = 0x0000;

/// The font's replacement box, used for unpaired surrogates.
pub const UNKNOWN_GLYPH: u32 = 0x007F;

// ============================================================================
// Colour codes
// ============================================================================

/// Clears the active colour.
pub const COLOUR_CLEAR: u32 = 0x10_0000;

/// Low 16 bits of a codepoint in this block are an RGBA4444 colour.
pub const COLOUR_BLOCK: RangeInclusive<u32> = 0x10_F000..=0x10_FFFF;

pub fn is_colour_code(c: u32) -> bool {
    c == COLOUR_CLEAR || COLOUR_BLOCK.contains(&c)
}

/// RGBA4444 payload of a colour codepoint, `None` for the clear code and
/// anything outside the block.
pub fn colour_rgba4444(c: u32) -> Option<u16> {
    COLOUR_BLOCK.contains(&c).then_some((c & 0xFFFF) as u16)
}

// ============================================================================
// Charset overrides
// ============================================================================

pub const CHARSET_OVERRIDE_DEFAULT: u32 = 0xF_FFC0;
pub const CHARSET_OVERRIDE_BG_BG: u32 = 0xF_FFC1;
pub const CHARSET_OVERRIDE_SR_SR: u32 = 0xF_FFC2;
pub const CHARSET_OVERRIDE_CODESTYLE: u32 = 0xF_FFC3;

/// Which charset an override codepoint selects, if it is one.
pub fn charset_override(c: u32) -> Option<CharsetOverride> {
    if (CHARSET_OVERRIDE_DEFAULT..=CHARSET_OVERRIDE_CODESTYLE).contains(&c) {
        CharsetOverride::from_selector_index(c - CHARSET_OVERRIDE_DEFAULT)
    } else {
        None
    }
}

/// The override codepoint that selects `charset`.
pub fn charset_override_codepoint(charset: CharsetOverride) -> u32 {
    CHARSET_OVERRIDE_DEFAULT + charset.selector_index()
}

/// Remap `c` into the alternative glyph block of `charset` when it falls in
/// that charset's domain.
pub fn remap_for_charset(c: u32, charset: CharsetOverride) -> u32 {
    let (domain, offset) = match charset {
        CharsetOverride::Default => return c,
        CharsetOverride::Bulgarian => (0x400..0x460, 0xF_0000 - 0x400),
        CharsetOverride::Serbian => (0x400..0x460, 0xF_0060 - 0x400),
        CharsetOverride::Codestyle => (0x20..0x80, 0xF_0520 - 0x20),
    };
    if domain.contains(&c) { c + offset } else { c }
}

// ============================================================================
// Rich-text markers
// ============================================================================

pub const RICH_TEXT_RUBY: u32 = 0xF_FFB0;
pub const RICH_TEXT_SUPERSCRIPT: u32 = 0xF_FFB1;
pub const RICH_TEXT_SUBSCRIPT: u32 = 0xF_FFB2;
pub const RICH_TEXT_TAG_END: u32 = 0xF_FFBF;

pub fn is_rich_text_marker(c: u32) -> bool {
    matches!(
        c,
        RICH_TEXT_RUBY | RICH_TEXT_SUPERSCRIPT | RICH_TEXT_SUBSCRIPT | RICH_TEXT_TAG_END
    )
}

// ============================================================================
// Zero-width internal block
// ============================================================================

/// Internal control block: override selectors, rich-text markers and
/// spacing directives all live here and are drawn as nothing.
pub const INTERNAL_CONTROL_BLOCK: RangeInclusive<u32> = 0xF_FFA0..=0xF_FFFF;

/// Codepoints the position builder skips over without advancing.
pub fn is_control(c: u32) -> bool {
    is_colour_code(c) || INTERNAL_CONTROL_BLOCK.contains(&c)
}

// ============================================================================
// Spacing and joiners
// ============================================================================

pub const ZWNJ: u32 = 0x200C;
pub const ZWJ: u32 = 0x200D;

// ============================================================================
// Dotted letters and kerning specials
// ============================================================================

pub const LATIN_SMALL_I: u32 = 0x0069;
pub const LATIN_SMALL_J: u32 = 0x006A;
pub const LATIN_SMALL_DOTLESS_I: u32 = 0x0131;
pub const LATIN_SMALL_DOTLESS_J: u32 = 0x0237;

/// The dotless counterpart of a dotted lowercase letter.
pub fn dotless_variant(c: u32) -> Option<u32> {
    match c {
        LATIN_SMALL_I => Some(LATIN_SMALL_DOTLESS_I),
        LATIN_SMALL_J => Some(LATIN_SMALL_DOTLESS_J),
        _ => None,
    }
}

/// Lowercase r and its accented forms; these tuck a following full stop or
/// comma under their arm.
pub const LOWERCASE_RS: [u32; 10] = [
    0x72, 0x155, 0x157, 0x159, 0x211, 0x213, 0x27C, 0x1E59, 0x1E58, 0x1E5F,
];

pub const DOTS: [u32; 2] = [0x2C, 0x2E];
