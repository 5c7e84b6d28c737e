//! Per-codepoint glyph properties decoded from the sprite sheets.
//!
//! The table is built once when a font is constructed and is read-only
//! afterwards, so it can be shared across threads behind an `Arc`.

mod cell;

pub use cell::{decode_cell, encode_cell};

use std::collections::HashMap;

use crate::codepoints::{COLOUR_BLOCK, COLOUR_CLEAR, INTERNAL_CONTROL_BLOCK, SENTINEL, UNKNOWN_GLYPH};
use crate::error::{FontError, Result};
use crate::glyph_props::GlyphProperty;
use crate::hangul;
use crate::pixels::PixelSource;
use crate::sheets::{
    self, CodeRangeRegistry, SHEET_CUSTOM_SYM, SHEET_HANGUL, SHEET_RUNIC, SHEET_UNIHAN, SheetId,
};

/// Width of a Hangul jamo or compatibility jamo.
pub const W_HANGUL: i32 = 13;
pub const W_UNIHAN: i32 = 16;
pub const W_CUSTOM_SYM: i32 = 20;
pub const W_RUNIC: i32 = 9;
/// Width of the replacement box at U+007F.
pub const W_UNKNOWN_GLYPH: i32 = 15;

/// Constant width of a fixed-pitch sheet, `None` for sheets that carry tag
/// columns.
fn fixed_width(sheet: SheetId) -> Option<i32> {
    match sheet {
        SHEET_HANGUL => Some(W_HANGUL),
        SHEET_UNIHAN => Some(W_UNIHAN),
        SHEET_CUSTOM_SYM => Some(W_CUSTOM_SYM),
        SHEET_RUNIC => Some(W_RUNIC),
        _ => None,
    }
}

/// Codepoint → [`GlyphProperty`] map with a fallback for unknown
/// codepoints.
#[derive(Debug, Clone)]
pub struct GlyphMetadataTable {
    registry: CodeRangeRegistry,
    props: HashMap<u32, GlyphProperty>,
    fallback: GlyphProperty,
}

impl GlyphMetadataTable {
    /// Decode every declared sheet.
    ///
    /// `images` is indexed like the registry's sheet list; a `None` entry
    /// means the sheet file was not available and its variable-width glyphs
    /// stay unknown. Fixed-pitch sheets get their constant widths either
    /// way.
    pub fn from_sheets<P: PixelSource>(registry: CodeRangeRegistry, images: &[Option<P>]) -> Self {
        let mut props = HashMap::new();

        for (sheet, spec) in registry.sheets().iter().enumerate() {
            if let Some(width) = fixed_width(sheet) {
                for (c, _) in spec.codepoints() {
                    props.insert(c, GlyphProperty::with_width(width));
                }
                continue;
            }
            if !spec.variable {
                continue;
            }

            let Some(Some(img)) = images.get(sheet) else {
                continue;
            };

            let cell_w = sheets::cell_width(registry.sheets(), sheet);
            let cell_h = sheets::cell_height(sheet);
            let cols = sheets::columns(sheet);
            let xy_swapped = spec.is_xy_swapped();

            let mut decoded = 0usize;
            for (c, local) in spec.codepoints() {
                let (col, row) = if xy_swapped {
                    (local / cols, local % cols)
                } else {
                    (local % cols, local / cols)
                };
                let prop = decode_cell(img, col * cell_w, row * cell_h, cell_w);
                props.insert(c, prop);
                decoded += 1;
            }
            log::debug!("Decoded {} glyphs from {}", decoded, spec.file_name);
        }

        let mut table = Self {
            registry,
            props,
            fallback: GlyphProperty::default(),
        };
        table.apply_overrides();
        log::info!("Glyph metadata table ready: {} codepoints", table.props.len());
        table
    }

    /// Table over explicit properties, for callers that build metadata
    /// without sheet images.
    pub fn from_properties(
        registry: CodeRangeRegistry,
        props: impl IntoIterator<Item = (u32, GlyphProperty)>,
    ) -> Self {
        let mut table = Self {
            registry,
            props: props.into_iter().collect(),
            fallback: GlyphProperty::default(),
        };
        table.apply_overrides();
        table
    }

    /// Widths the asset pack never encodes in pixels.
    fn apply_overrides(&mut self) {
        for c in hangul::COMPAT_JAMO {
            self.props
                .entry(c)
                .or_insert_with(|| GlyphProperty::with_width(W_HANGUL));
        }
        for c in (0xD800..=0xDFFF).chain(INTERNAL_CONTROL_BLOCK).chain(COLOUR_BLOCK) {
            self.props.insert(c, GlyphProperty::with_width(0));
        }
        self.props.insert(COLOUR_CLEAR, GlyphProperty::with_width(0));
        self.props.insert(SENTINEL, GlyphProperty::with_width(0));
        self.props
            .entry(UNKNOWN_GLYPH)
            .or_default()
            .width = W_UNKNOWN_GLYPH;
    }

    /// Add or replace the property of one codepoint.
    pub fn insert(&mut self, c: u32, prop: GlyphProperty) {
        self.props.insert(c, prop);
    }

    pub fn registry(&self) -> &CodeRangeRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn contains(&self, c: u32) -> bool {
        self.props.contains_key(&c)
    }

    /// The decoded property, if the codepoint has one.
    pub fn get(&self, c: u32) -> Option<&GlyphProperty> {
        self.props.get(&c)
    }

    /// The decoded property or the zero-width default.
    pub fn get_or_default(&self, c: u32) -> &GlyphProperty {
        self.props.get(&c).unwrap_or(&self.fallback)
    }

    /// Lookup under the caller's missing-glyph policy: strict lookups fail
    /// with [`FontError::MissingGlyphMetadata`], tolerant ones fall back to
    /// the default property.
    ///
    /// A cell whose directive marks it illegal counts as missing.
    pub fn lookup(&self, c: u32, strict: bool) -> Result<&GlyphProperty> {
        match self.props.get(&c).filter(|p| !p.directive.is_illegal()) {
            Some(prop) => Ok(prop),
            None if strict => Err(FontError::MissingGlyphMetadata { codepoint: c }),
            None => Ok(&self.fallback),
        }
    }

    /// Sheet of a codepoint, see [`CodeRangeRegistry::sheet_of`].
    pub fn sheet_of(&self, c: u32) -> SheetId {
        self.registry.sheet_of(c)
    }
}
