//! Shape-rule kerning.
//!
//! Each glyph with kerning data carries a shape mask describing its
//! silhouette at the cap, x-height and baseline corners. A rule pairs a
//! pattern for the trailing glyph with one for the leading glyph; the
//! first rule matching both decides the contraction.
//!
//! Pattern strings have one character per bit of [`KEMING_BIT_MASK`]:
//! `@` the bit must be set, `` ` `` the bit must be clear, `_` don't care.
//! Bits come in left/right pairs, so swapping every pair and the roles of
//! the two patterns yields the mirrored rule.

use crate::codepoints::{DOTS, LOWERCASE_RS};
use crate::glyph_props::GlyphProperty;

/// Shape-mask bit addressed by each pattern position.
pub const KEMING_BIT_MASK: [u32; 10] = [
    1 << 7,
    1 << 6,
    1 << 5,
    1 << 4,
    1 << 3,
    1 << 2,
    1 << 1,
    1 << 0,
    1 << 15,
    1 << 14,
];

/// The authored rules: trailing pattern, leading pattern, ordinary
/// contraction, contraction when either glyph is Y-type.
const AUTHORED_RULES: [(&str, &str, i32, i32); 6] = [
    ("_`_@___`__", "`_`___@___", 2, 1),
    ("_@_`___`__", "`_________", 2, 1),
    ("_@_@___`__", "`___@_@___", 1, 1),
    ("_@_@_`_`__", "`_____@___", 2, 1),
    ("___`_`____", "`___@_`___", 2, 1),
    ("___`_`____", "`_@___`___", 2, 1),
];

/// Contraction between a lowercase r and a following full stop or comma.
const R_DOT_CONTRACTION: i32 = 1;

/// One side of a kerning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapePattern {
    /// Bits that take part in the match
    pub care: u32,
    /// Required values of the cared-for bits
    pub required: u32,
}

impl ShapePattern {
    /// Parse a pattern string; characters other than `@` and `` ` `` are
    /// wildcards and positions past the tenth are ignored.
    pub fn parse(pattern: &str) -> Self {
        let mut care = 0;
        let mut required = 0;
        for (ch, bit) in pattern.chars().zip(KEMING_BIT_MASK) {
            match ch {
                '@' => {
                    care |= bit;
                    required |= bit;
                }
                '`' => care |= bit,
                _ => {}
            }
        }
        Self { care, required }
    }

    pub fn matches(&self, shape: u32) -> bool {
        shape & self.care == self.required
    }

    /// Swap the bits of every left/right pair.
    fn pair_swapped(&self) -> Self {
        Self {
            care: swap_pairs(self.care),
            required: swap_pairs(self.required),
        }
    }
}

fn swap_pairs(mask: u32) -> u32 {
    KEMING_BIT_MASK
        .iter()
        .enumerate()
        .filter(|(_, bit)| mask & **bit != 0)
        .fold(0, |acc, (pos, _)| acc | KEMING_BIT_MASK[pos ^ 1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KerningRule {
    /// Pattern for the trailing glyph of the current base
    pub left: ShapePattern,
    /// Pattern for the leading glyph of the next base
    pub right: ShapePattern,
    /// Contraction in pixels for ordinary glyphs
    pub contraction: i32,
    /// Contraction when either glyph is Y-type
    pub contraction_y: i32,
}

impl KerningRule {
    pub fn parse(left: &str, right: &str, contraction: i32, contraction_y: i32) -> Self {
        Self {
            left: ShapePattern::parse(left),
            right: ShapePattern::parse(right),
            contraction,
            contraction_y,
        }
    }

    /// The same rule seen from the other side.
    pub fn mirrored(&self) -> Self {
        Self {
            left: self.right.pair_swapped(),
            right: self.left.pair_swapped(),
            ..*self
        }
    }

    pub fn matches(&self, left_shape: u32, right_shape: u32) -> bool {
        self.left.matches(left_shape) && self.right.matches(right_shape)
    }
}

/// Ordered rule table: the authored rules followed by their mirrors.
#[derive(Debug, Clone)]
pub struct KerningEngine {
    rules: Vec<KerningRule>,
}

impl Default for KerningEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KerningEngine {
    /// Engine over the font's own rule set.
    pub fn builtin() -> Self {
        Self::new(
            AUTHORED_RULES
                .iter()
                .map(|&(l, r, bb, yy)| KerningRule::parse(l, r, bb, yy)),
        )
    }

    /// Engine over authored rules, mirroring each one.
    pub fn new(authored: impl IntoIterator<Item = KerningRule>) -> Self {
        let base: Vec<KerningRule> = authored.into_iter().collect();
        let mirrored: Vec<KerningRule> = base.iter().map(KerningRule::mirrored).collect();
        let mut rules = base;
        rules.extend(mirrored);
        Self { rules }
    }

    pub fn rules(&self) -> &[KerningRule] {
        &self.rules
    }

    /// First rule matching the two shape masks.
    pub fn find_rule(&self, left_shape: u32, right_shape: u32) -> Option<&KerningRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(left_shape, right_shape))
    }

    /// Rule-based contraction in pixels (positive means tighter). Zero
    /// unless both glyphs carry kerning data.
    pub fn contraction(&self, left: &GlyphProperty, right: &GlyphProperty) -> i32 {
        if !(left.has_kern_data && right.has_kern_data) {
            return 0;
        }
        self.find_rule(left.kerning_mask, right.kerning_mask)
            .map_or(0, |rule| {
                if left.is_kern_y_type || right.is_kern_y_type {
                    rule.contraction_y
                } else {
                    rule.contraction
                }
            })
    }

    /// Signed advance adjustment between two adjacent glyphs.
    pub fn adjustment(
        &self,
        left_cp: u32,
        left: &GlyphProperty,
        right_cp: u32,
        right: &GlyphProperty,
    ) -> i32 {
        let contraction = self.contraction(left, right);
        if contraction > 0 {
            return -contraction;
        }
        if LOWERCASE_RS.contains(&left_cp) && DOTS.contains(&right_cp) {
            return -R_DOT_CONTRACTION;
        }
        0
    }
}
