//! Per-glyph shaping properties.

use crate::sheets::W_VAR_INIT;

/// Number of diacritic anchors a glyph can declare.
pub const ANCHOR_COUNT: usize = 6;

/// Shape mask given to glyphs without kerning data.
pub const KERNING_MASK_NONE: u32 = 0xFF_FFFF;

/// Horizontal alignment of a glyph inside its nominal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Centre,
    /// Drawn before the glyph it logically follows
    Before,
}

impl Align {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Align::Left,
            1 => Align::Right,
            2 => Align::Centre,
            _ => Align::Before,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Align::Left => 0,
            Align::Right => 1,
            Align::Centre => 2,
            Align::Before => 3,
        }
    }
}

/// How a diacritic stacks against others on the same base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stack {
    #[default]
    Up,
    Down,
    /// Split into a before part and an after part around the base
    BeforeAndAfter,
    UpAndDown,
    DontStack,
}

impl Stack {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Stack::Up,
            1 => Stack::Down,
            2 => Stack::BeforeAndAfter,
            _ => Stack::UpAndDown,
        }
    }

    /// Two-bit code, `None` for [`Stack::DontStack`] which has its own
    /// pixel pattern.
    pub fn bits(self) -> Option<u32> {
        match self {
            Stack::Up => Some(0),
            Stack::Down => Some(1),
            Stack::BeforeAndAfter => Some(2),
            Stack::UpAndDown => Some(3),
            Stack::DontStack => None,
        }
    }
}

/// Where a diacritic of a given type attaches to this glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiacriticAnchor {
    /// Diacritic type this anchor serves (its index)
    pub kind: u8,
    pub x: u8,
    pub y: u8,
    pub x_used: bool,
    pub y_used: bool,
}

impl DiacriticAnchor {
    pub fn unused(kind: u8) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Compiler directive slot. Only the replace-with pragma and the illegal
/// marker are interpreted; the arguments are kept for forward
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Directive {
    pub opcode: u8,
    pub arg1: u8,
    pub arg2: u8,
}

impl Directive {
    pub fn is_illegal(&self) -> bool {
        self.opcode == 255
    }

    pub fn is_replace_with(&self) -> bool {
        (0b1000_0000..=0b1000_0111).contains(&self.opcode)
    }
}

/// Everything the shaper knows about one codepoint's glyph.
///
/// Compared structurally: two properties are equal only if every field is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphProperty {
    /// Advance width in pixels
    pub width: i32,
    /// The glyph sits below the x-height (lowercase without ascender)
    pub is_low_height: bool,
    pub nudge_x: i32,
    pub nudge_y: i32,
    pub anchors: [DiacriticAnchor; ANCHOR_COUNT],
    pub align: Align,
    /// `None` for ordinary glyphs, the diacritic type otherwise
    pub write_on_top: Option<u8>,
    pub stack: Stack,
    /// Two glyphs for [`Stack::BeforeAndAfter`], seven replacement slots for
    /// the replace-with pragma, empty otherwise
    pub extra_info: Vec<u32>,
    pub has_kern_data: bool,
    pub is_kern_y_type: bool,
    /// 24-bit shape descriptor matched by the kerning rules
    pub kerning_mask: u32,
    pub directive: Directive,
}

impl Default for GlyphProperty {
    fn default() -> Self {
        Self {
            width: 0,
            is_low_height: false,
            nudge_x: 0,
            nudge_y: 0,
            anchors: std::array::from_fn(|i| DiacriticAnchor::unused(i as u8)),
            align: Align::Left,
            write_on_top: None,
            stack: Stack::Up,
            extra_info: Vec::new(),
            has_kern_data: false,
            is_kern_y_type: false,
            kerning_mask: KERNING_MASK_NONE,
            directive: Directive::default(),
        }
    }
}

impl GlyphProperty {
    /// An ordinary glyph of the given width.
    pub fn with_width(width: i32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Diacritics draw over their base instead of advancing.
    pub fn is_diacritic(&self) -> bool {
        self.write_on_top.is_some()
    }

    /// How many extra-info columns the cell carries.
    pub fn required_extra_info_count(&self) -> usize {
        if self.stack == Stack::BeforeAndAfter {
            2
        } else if self.directive.is_replace_with() {
            7
        } else {
            0
        }
    }

    /// Anchor for diacritic type `kind`, if the glyph declares one.
    pub fn anchor(&self, kind: u8) -> Option<&DiacriticAnchor> {
        self.anchors
            .get(kind as usize)
            .filter(|a| a.x_used || a.y_used)
    }

    /// Codepoints this glyph expands to under the replace-with pragma.
    pub fn replacement(&self) -> Option<Vec<u32>> {
        self.directive
            .is_replace_with()
            .then(|| self.extra_info.iter().copied().filter(|&c| c != 0).collect())
    }

    /// Horizontal shift from the pen position to where the bitmap is drawn.
    pub fn draw_offset(&self) -> i32 {
        let overhang = self.width - W_VAR_INIT as i32;
        match self.align {
            Align::Right => overhang,
            Align::Centre => (overhang + 1).div_euclid(2),
            Align::Left | Align::Before => 0,
        }
    }

    /// Pen advance this glyph contributes when it is the base.
    pub fn advance(&self) -> i32 {
        let overhang = (self.width - W_VAR_INIT as i32).max(0);
        match self.align {
            Align::Right => self.width + overhang,
            Align::Centre => self.width + (overhang + 1) / 2,
            Align::Left | Align::Before => self.width,
        }
    }
}
