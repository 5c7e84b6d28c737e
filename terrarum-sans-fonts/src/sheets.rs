//! The fixed list of sprite sheets and the codepoint ranges they cover.
//!
//! Sheet order and file names are part of the asset-pack format: sheet `n`
//! is always loaded from the `n`th file name and covers exactly the `n`th
//! list of ranges. Cells inside a sheet follow the concatenated ranges in
//! order, sixteen to a row.
//!
//! [`CodeRangeRegistry`] resolves a codepoint to its sheet and cell. Two
//! declarations overlap (the Devanagari sheet reserves U+F0110..U+F012F,
//! which the internal Devanagari sheet also claims); the later sheet wins,
//! matching the order in which decoded metadata is merged.

use std::ops::Range;

use crate::error::{FontError, Result};
use crate::hangul;

/// Index of a sheet in [`SHEETS`].
pub type SheetId = usize;

pub const SHEET_ASCII_VARW: SheetId = 0;
pub const SHEET_HANGUL: SheetId = 1;
pub const SHEET_EXTA_VARW: SheetId = 2;
pub const SHEET_EXTB_VARW: SheetId = 3;
pub const SHEET_KANA: SheetId = 4;
pub const SHEET_CJK_PUNCT: SheetId = 5;
pub const SHEET_UNIHAN: SheetId = 6;
pub const SHEET_CYRILIC_VARW: SheetId = 7;
pub const SHEET_HALFWIDTH_FULLWIDTH_VARW: SheetId = 8;
pub const SHEET_UNI_PUNCT_VARW: SheetId = 9;
pub const SHEET_GREEK_VARW: SheetId = 10;
pub const SHEET_THAI_VARW: SheetId = 11;
pub const SHEET_HAYEREN_VARW: SheetId = 12;
pub const SHEET_KARTULI_VARW: SheetId = 13;
pub const SHEET_IPA_VARW: SheetId = 14;
pub const SHEET_RUNIC: SheetId = 15;
pub const SHEET_LATIN_EXT_ADD_VARW: SheetId = 16;
pub const SHEET_CUSTOM_SYM: SheetId = 17;
pub const SHEET_BULGARIAN_VARW: SheetId = 18;
pub const SHEET_SERBIAN_VARW: SheetId = 19;
pub const SHEET_TSALAGI_VARW: SheetId = 20;
pub const SHEET_PHONETIC_EXT_VARW: SheetId = 21;
pub const SHEET_DEVANAGARI_VARW: SheetId = 22;
pub const SHEET_KARTULI_CAPS_VARW: SheetId = 23;
pub const SHEET_DIACRITICAL_MARKS_VARW: SheetId = 24;
pub const SHEET_GREEK_POLY_VARW: SheetId = 25;
pub const SHEET_EXTC_VARW: SheetId = 26;
pub const SHEET_EXTD_VARW: SheetId = 27;
pub const SHEET_CURRENCIES_VARW: SheetId = 28;
pub const SHEET_INTERNAL_VARW: SheetId = 29;
pub const SHEET_LETTERLIKE_MATHS_VARW: SheetId = 30;
pub const SHEET_ENCLOSED_ALPHNUM_SUPL_VARW: SheetId = 31;
pub const SHEET_TAMIL_VARW: SheetId = 32;
pub const SHEET_BENGALI_VARW: SheetId = 33;
pub const SHEET_BRAILLE_VARW: SheetId = 34;
pub const SHEET_SUNDANESE_VARW: SheetId = 35;
pub const SHEET_DEVANAGARI2_INTERNAL_VARW: SheetId = 36;
pub const SHEET_CODESTYLE_ASCII_VARW: SheetId = 37;
pub const SHEET_ALPHABETIC_PRESENTATION_FORMS: SheetId = 38;
pub const SHEET_HENTAIGANA_VARW: SheetId = 39;

/// Returned by [`CodeRangeRegistry::sheet_of`] for unmapped codepoints.
pub const SHEET_UNKNOWN: SheetId = 254;

// Font metrics shared by the sheet geometry and the position builder.
pub const H: u32 = 20;
pub const H_UNIHAN: u32 = 16;
pub const W_HANGUL_BASE: u32 = 13;
pub const W_UNIHAN: u32 = 16;
pub const W_LATIN_WIDE: u32 = 9;
pub const W_VAR_INIT: u32 = 15;
pub const W_WIDEVAR_INIT: u32 = 31;
pub const HGAP_VAR: u32 = 1;
pub const SIZE_CUSTOM_SYM: u32 = 20;
pub const LINE_HEIGHT: u32 = 24;

/// Declaration of one sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSpec {
    /// File name inside the asset directory
    pub file_name: &'static str,
    /// Codepoint ranges in cell order
    pub ranges: &'static [Range<u32>],
    /// Whether the sheet is registered as carrying per-glyph tag columns
    pub variable: bool,
}

impl SheetSpec {
    pub const fn new(file_name: &'static str, ranges: &'static [Range<u32>], variable: bool) -> Self {
        Self {
            file_name,
            ranges,
            variable,
        }
    }

    /// What the file name says about variable width.
    pub fn is_variable_by_name(&self) -> bool {
        self.file_name.ends_with("_variable.tga")
    }

    /// Column-major cell layout.
    pub fn is_xy_swapped(&self) -> bool {
        self.file_name.to_ascii_lowercase().contains("xyswap")
    }

    /// 32 px cells instead of 16.
    pub fn is_extra_wide(&self) -> bool {
        self.file_name.to_ascii_lowercase().contains("extrawide")
    }

    /// Number of codepoints (cells) the sheet declares.
    pub fn glyph_count(&self) -> u32 {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }

    /// Every declared codepoint paired with its local (cell) index.
    pub fn codepoints(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.ranges.iter().flat_map(|r| r.clone()).zip(0u32..)
    }

    /// Check that the name suffix and the registration agree.
    pub fn validate(&self) -> Result<()> {
        if self.is_variable_by_name() != self.variable {
            let reason = if self.variable {
                "registered as variable-width but the file name lacks the `_variable` suffix"
            } else {
                "file name carries the `_variable` suffix but the sheet is registered as fixed-width"
            };
            return Err(FontError::MalformedAssetDeclaration {
                file_name: self.file_name.to_string(),
                reason: reason.to_string(),
            });
        }
        Ok(())
    }
}

/// The sheet list of the asset pack, indexed by [`SheetId`].
pub static SHEETS: [SheetSpec; 40] = [
    SheetSpec::new("ascii_variable.tga", &[0x00..0x100], true),
    SheetSpec::new("hangul_johab.tga", &[0x1100..0x1200, 0xA960..0xA980, 0xD7B0..0xD800], false),
    SheetSpec::new("latinExtA_variable.tga", &[0x100..0x180], true),
    SheetSpec::new("latinExtB_variable.tga", &[0x180..0x250], true),
    SheetSpec::new("kana_variable.tga", &[0x3040..0x3100, 0x31F0..0x3200], true),
    SheetSpec::new("cjkpunct_variable.tga", &[0x3000..0x3040], true),
    SheetSpec::new("wenquanyi.tga", &[0x3400..0xA000], false),
    SheetSpec::new("cyrilic_variable.tga", &[0x400..0x530], true),
    SheetSpec::new("halfwidth_fullwidth_variable.tga", &[0xFF00..0x10000], true),
    SheetSpec::new("unipunct_variable.tga", &[0x2000..0x20A0], true),
    SheetSpec::new("greek_variable.tga", &[0x370..0x3CF], true),
    SheetSpec::new("thai_variable.tga", &[0xE00..0xE60], true),
    SheetSpec::new("hayeren_variable.tga", &[0x530..0x590], true),
    SheetSpec::new("kartuli_variable.tga", &[0x10D0..0x1100], true),
    SheetSpec::new("ipa_ext_variable.tga", &[0x250..0x300], true),
    SheetSpec::new("futhark.tga", &[0x16A0..0x1700], false),
    SheetSpec::new("latinExt_additional_variable.tga", &[0x1E00..0x1F00], true),
    SheetSpec::new("puae000-e0ff.tga", &[0xE000..0xE100], false),
    SheetSpec::new("cyrilic_bulgarian_variable.tga", &[0xF0000..0xF0060], true),
    SheetSpec::new("cyrilic_serbian_variable.tga", &[0xF0060..0xF00C0], true),
    SheetSpec::new("tsalagi_variable.tga", &[0x13A0..0x13F6], true),
    SheetSpec::new("phonetic_extensions_variable.tga", &[0x1D00..0x1DC0], true),
    SheetSpec::new("devanagari_variable.tga", &[0x900..0x980, 0xF0100..0xF0500], true),
    SheetSpec::new("kartuli_allcaps_variable.tga", &[0x1C90..0x1CC0], true),
    SheetSpec::new("diacritical_marks_variable.tga", &[0x300..0x370], true),
    SheetSpec::new("greek_polytonic_xyswap_variable.tga", &[0x1F00..0x2000], true),
    SheetSpec::new("latinExtC_variable.tga", &[0x2C60..0x2C80], true),
    SheetSpec::new("latinExtD_variable.tga", &[0xA720..0xA800], true),
    SheetSpec::new("currencies_variable.tga", &[0x20A0..0x20D0], true),
    SheetSpec::new("internal_variable.tga", &[0xFFE00..0xFFFA0], true),
    SheetSpec::new("letterlike_symbols_variable.tga", &[0x2100..0x2150], true),
    SheetSpec::new("enclosed_alphanumeric_supplement_variable.tga", &[0x1F100..0x1F200], true),
    SheetSpec::new("tamil_extrawide_variable.tga", &[0x0B80..0x0C00, 0xF00C0..0xF0100], true),
    SheetSpec::new("bengali_variable.tga", &[0x980..0xA00], true),
    SheetSpec::new("braille_variable.tga", &[0x2800..0x2900], true),
    SheetSpec::new(
        "sundanese_variable.tga",
        &[0x1B80..0x1BC0, 0x1CC0..0x1CD0, 0xF0500..0xF0510],
        true,
    ),
    SheetSpec::new("devanagari_internal_extrawide_variable.tga", &[0xF0110..0xF0130], true),
    SheetSpec::new("pua_codestyle_ascii_variable.tga", &[0xF0520..0xF0580], true),
    SheetSpec::new(
        "alphabetic_presentation_forms_extrawide_variable.tga",
        &[0xFB00..0xFB18],
        true,
    ),
    SheetSpec::new("hentaigana_variable.tga", &[0x1B000..0x1B170], true),
];

/// Cell pitch of a sheet in pixels, tag column included.
pub fn cell_width(sheets: &[SheetSpec], sheet: SheetId) -> u32 {
    let spec = &sheets[sheet];
    if spec.is_extra_wide() {
        return W_WIDEVAR_INIT + HGAP_VAR;
    }
    if spec.variable {
        return W_VAR_INIT + HGAP_VAR;
    }
    match sheet {
        SHEET_UNIHAN => W_UNIHAN,
        SHEET_HANGUL => W_HANGUL_BASE,
        SHEET_CUSTOM_SYM => SIZE_CUSTOM_SYM,
        SHEET_RUNIC => W_LATIN_WIDE,
        _ => W_VAR_INIT + HGAP_VAR,
    }
}

pub fn cell_height(sheet: SheetId) -> u32 {
    match sheet {
        SHEET_UNIHAN => H_UNIHAN,
        SHEET_CUSTOM_SYM => SIZE_CUSTOM_SYM,
        _ => H,
    }
}

pub fn columns(sheet: SheetId) -> u32 {
    if sheet == SHEET_UNIHAN { 256 } else { 16 }
}

/// Where a glyph's cell sits inside its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphLocation {
    pub sheet: SheetId,
    /// Cell column
    pub column: u32,
    /// Cell row
    pub row: u32,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: u32,
    end: u32,
    sheet: SheetId,
    local_base: u32,
}

/// Maps codepoints to `(sheet, local index)` through sorted, disjoint
/// segments.
#[derive(Debug, Clone)]
pub struct CodeRangeRegistry {
    sheets: Vec<SheetSpec>,
    segments: Vec<Segment>,
}

impl CodeRangeRegistry {
    /// Registry over the asset pack's sheet list.
    pub fn builtin() -> Result<Self> {
        Self::new(&SHEETS)
    }

    /// Build a registry from sheet declarations, refusing inconsistent ones.
    ///
    /// Where declarations overlap, the sheet declared later owns the
    /// overlapping codepoints.
    pub fn new(sheets: &[SheetSpec]) -> Result<Self> {
        let mut segments: Vec<Segment> = Vec::new();

        for (sheet, spec) in sheets.iter().enumerate() {
            spec.validate()?;

            let mut local_base = 0;
            for range in spec.ranges {
                let incoming = Segment {
                    start: range.start,
                    end: range.end,
                    sheet,
                    local_base,
                };
                local_base += range.end - range.start;

                let mut kept = Vec::with_capacity(segments.len() + 1);
                for seg in segments.drain(..) {
                    if seg.end <= incoming.start || seg.start >= incoming.end {
                        kept.push(seg);
                        continue;
                    }
                    if seg.start < incoming.start {
                        kept.push(Segment {
                            end: incoming.start,
                            ..seg
                        });
                    }
                    if seg.end > incoming.end {
                        kept.push(Segment {
                            start: incoming.end,
                            local_base: seg.local_base + (incoming.end - seg.start),
                            ..seg
                        });
                    }
                }
                kept.push(incoming);
                segments = kept;
            }
        }

        segments.sort_by_key(|s| s.start);
        log::debug!(
            "Code range registry: {} sheets, {} segments",
            sheets.len(),
            segments.len()
        );

        Ok(Self {
            sheets: sheets.to_vec(),
            segments,
        })
    }

    /// The sheet declarations this registry was built from.
    pub fn sheets(&self) -> &[SheetSpec] {
        &self.sheets
    }

    /// Resolve a codepoint to its sheet and local cell index.
    pub fn lookup(&self, c: u32) -> Option<(SheetId, u32)> {
        let idx = self.segments.partition_point(|s| s.end <= c);
        let seg = self.segments.get(idx)?;
        (seg.start <= c).then(|| (seg.sheet, seg.local_base + (c - seg.start)))
    }

    /// Sheet of a codepoint, [`SHEET_UNKNOWN`] when unmapped.
    pub fn sheet_of(&self, c: u32) -> SheetId {
        self.lookup(c).map_or(SHEET_UNKNOWN, |(sheet, _)| sheet)
    }

    /// Cell coordinates of a codepoint's default glyph.
    pub fn locate(&self, c: u32) -> Option<GlyphLocation> {
        let (sheet, local) = self.lookup(c)?;

        if sheet == SHEET_HANGUL {
            let (column, row) = hangul::jamo_default_cell(c)?;
            return Some(GlyphLocation { sheet, column, row });
        }

        let cols = columns(sheet);
        let (column, row) = if self.sheets[sheet].is_xy_swapped() {
            (local / cols, local % cols)
        } else {
            (local % cols, local / cols)
        };
        Some(GlyphLocation { sheet, column, row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_declarations_are_consistent() {
        assert!(CodeRangeRegistry::builtin().is_ok());
        assert_eq!(SHEETS.len(), 40);
    }

    #[test]
    fn test_lookup_local_index_spans_ranges() {
        let reg = CodeRangeRegistry::builtin().unwrap();
        assert_eq!(reg.lookup('A' as u32), Some((SHEET_ASCII_VARW, 0x41)));
        // Second range of the Devanagari sheet continues after the first
        assert_eq!(reg.lookup(0xF0100), Some((SHEET_DEVANAGARI_VARW, 0x80)));
        // Second range of the Kana sheet
        assert_eq!(reg.lookup(0x31F0), Some((SHEET_KANA, 0xC0)));
        assert_eq!(reg.lookup(0x10FFFF), None);
        assert_eq!(reg.sheet_of(0x0600), SHEET_UNKNOWN);
    }

    #[test]
    fn test_later_sheet_wins_on_overlap() {
        let reg = CodeRangeRegistry::builtin().unwrap();
        assert_eq!(reg.lookup(0xF0110), Some((SHEET_DEVANAGARI2_INTERNAL_VARW, 0)));
        assert_eq!(reg.lookup(0xF012F), Some((SHEET_DEVANAGARI2_INTERNAL_VARW, 0x1F)));
        // The Devanagari sheet keeps both sides of the carve-out
        assert_eq!(reg.lookup(0xF010F), Some((SHEET_DEVANAGARI_VARW, 0x8F)));
        assert_eq!(reg.lookup(0xF0130), Some((SHEET_DEVANAGARI_VARW, 0xB0)));
    }

    #[test]
    fn test_locate_layouts() {
        let reg = CodeRangeRegistry::builtin().unwrap();
        let a = reg.locate('A' as u32).unwrap();
        assert_eq!((a.column, a.row), (1, 4));

        let han = reg.locate(0x4E00).unwrap();
        assert_eq!(han.sheet, SHEET_UNIHAN);
        assert_eq!((han.column, han.row), ((0x4E00 - 0x3400) % 256, (0x4E00 - 0x3400) / 256));

        // Column-major sheet
        let poly = reg.locate(0x1F12).unwrap();
        assert_eq!((poly.column, poly.row), (1, 2));
    }

    #[test]
    fn test_cell_geometry() {
        assert_eq!(cell_width(&SHEETS, SHEET_ASCII_VARW), 16);
        assert_eq!(cell_width(&SHEETS, SHEET_TAMIL_VARW), 32);
        assert_eq!(cell_width(&SHEETS, SHEET_HANGUL), 13);
        assert_eq!(cell_width(&SHEETS, SHEET_RUNIC), 9);
        assert_eq!(cell_height(SHEET_UNIHAN), 16);
        assert_eq!(columns(SHEET_UNIHAN), 256);
    }

    #[test]
    fn test_name_registration_mismatch_is_fatal() {
        static BAD: [SheetSpec; 1] = [SheetSpec::new("ascii.tga", &[0..0x80], true)];
        let err = CodeRangeRegistry::new(&BAD).unwrap_err();
        assert!(matches!(err, FontError::MalformedAssetDeclaration { .. }));

        static BAD_REVERSE: [SheetSpec; 1] =
            [SheetSpec::new("ascii_variable.tga", &[0..0x80], false)];
        assert!(CodeRangeRegistry::new(&BAD_REVERSE).is_err());
    }
}
