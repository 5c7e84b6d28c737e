//! Text → [`NormalizedSequence`].
//!
//! One forward scan applies the script rules in priority order at each
//! position: charset overrides, Hangul, dotted-letter suppression, Tamil
//! and Sundanese ligatures, then Devanagari clusters. Three structural
//! passes follow, driven by glyph metadata: two-part vowel signs are
//! unpacked, before-aligned glyphs are moved in front of their base and
//! replace-with glyphs are expanded.
//!
//! Normalising an already normalised sequence changes nothing, except
//! that two-part vowel signs are unpacked (and reordered) again.

mod devanagari;
mod hangul;
mod ligatures;
mod structural;

pub use devanagari::{EYELASH_RA, REPH, REPH_COMPLEX, is_devanagari};

use terrarum_sans_config::CharsetOverride;

use crate::codepoints::{self, SENTINEL, UNKNOWN_GLYPH, ZWJ, ZWNJ};
use crate::error::{FontError, Result};
use crate::glyph_props::Stack;
use crate::metadata::GlyphMetadataTable;

/// Shaped codepoints bracketed by a sentinel at each end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedSequence {
    codepoints: Vec<u32>,
    truncated: bool,
}

impl NormalizedSequence {
    /// Bracket already shaped codepoints with sentinels.
    pub fn from_shaped(inner: impl IntoIterator<Item = u32>) -> Self {
        let mut codepoints = vec![SENTINEL];
        codepoints.extend(inner);
        codepoints.push(SENTINEL);
        Self {
            codepoints,
            truncated: false,
        }
    }

    /// All codepoints, sentinels included.
    pub fn codepoints(&self) -> &[u32] {
        &self.codepoints
    }

    /// The shaped codepoints without the sentinels.
    pub fn inner(&self) -> &[u32] {
        &self.codepoints[1..self.codepoints.len() - 1]
    }

    /// Number of codepoints, sentinels included.
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// True when nothing but the sentinels is left.
    pub fn is_empty(&self) -> bool {
        self.codepoints.len() <= 2
    }

    /// Whether a structural pass gave up midway and the tail was dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Runs the shaping rules against one metadata table.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    table: &'a GlyphMetadataTable,
    charset: CharsetOverride,
    strict: bool,
}

impl<'a> Normalizer<'a> {
    pub fn new(table: &'a GlyphMetadataTable) -> Self {
        Self {
            table,
            charset: CharsetOverride::Default,
            strict: false,
        }
    }

    /// Charset in effect at the start of every text.
    pub fn with_charset(mut self, charset: CharsetOverride) -> Self {
        self.charset = charset;
        self
    }

    /// Fail on codepoints without metadata instead of drawing nothing.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn normalize(&self, text: &str) -> Result<NormalizedSequence> {
        let codepoints: Vec<u32> = text.chars().map(u32::from).collect();
        self.normalize_codepoints(&codepoints)
    }

    /// Normalise UTF-16 input; unpaired surrogates become the unknown glyph.
    pub fn normalize_utf16(&self, units: &[u16]) -> Result<NormalizedSequence> {
        let codepoints: Vec<u32> = char::decode_utf16(units.iter().copied())
            .map(|r| r.map_or(UNKNOWN_GLYPH, u32::from))
            .collect();
        self.normalize_codepoints(&codepoints)
    }

    /// Normalise the inner codepoints of an existing sequence again.
    pub fn renormalize(&self, seq: &NormalizedSequence) -> Result<NormalizedSequence> {
        self.normalize_codepoints(seq.inner())
    }

    pub fn normalize_codepoints(&self, input: &[u32]) -> Result<NormalizedSequence> {
        let scanned = self.scan(input);
        let (shaped, truncated) = self.structural(scanned);

        if self.strict
            && let Some(&c) = shaped
                .iter()
                .find(|&&c| !codepoints::is_control(c) && !self.table.contains(c))
        {
            return Err(FontError::MissingGlyphMetadata { codepoint: c });
        }

        let mut seq = NormalizedSequence::from_shaped(shaped);
        seq.truncated = truncated;
        Ok(seq)
    }

    fn scan(&self, input: &[u32]) -> Vec<u32> {
        let mut out = Vec::with_capacity(input.len() + 8);
        let mut charset = self.charset;
        let mut i = 0;

        while i < input.len() {
            if let Some(selected) = codepoints::charset_override(input[i]) {
                charset = selected;
                out.push(input[i]);
                i += 1;
                continue;
            }

            let c = codepoints::remap_for_charset(input[i], charset);
            let next = input
                .get(i + 1)
                .map(|&n| codepoints::remap_for_charset(n, charset));

            if hangul::applies(c) {
                hangul::push(&mut out, c, next);
                i += 1;
                continue;
            }

            if let Some(dotless) = codepoints::dotless_variant(c)
                && next.is_some_and(|n| self.draws_on_top_upwards(n))
            {
                out.push(dotless);
                i += 1;
                continue;
            }

            if let Some((consumed, lig)) = ligatures::match_tamil(&input[i..])
                .or_else(|| ligatures::match_sundanese(&input[i..]))
            {
                out.push(lig);
                i += consumed;
                continue;
            }

            if devanagari::is_devanagari(c) {
                let end = input[i..]
                    .iter()
                    .position(|&n| !(devanagari::is_devanagari(n) || n == ZWJ || n == ZWNJ))
                    .map_or(input.len(), |p| i + p);
                devanagari::shape_run(self.table, &input[i..end], &mut out);
                i = end;
                continue;
            }

            out.push(c);
            i += 1;
        }
        out
    }

    fn draws_on_top_upwards(&self, c: u32) -> bool {
        let prop = self.table.get_or_default(c);
        prop.is_diacritic() && prop.stack == Stack::Up
    }

    /// Run the metadata-driven passes; a pass that meets an unknown
    /// codepoint keeps what it produced so far and the rest is dropped.
    fn structural(&self, seq: Vec<u32>) -> (Vec<u32>, bool) {
        let mut truncated = false;

        let mut unpacked = Vec::with_capacity(seq.len());
        if let Err(e) = structural::unpack_before_and_after(self.table, &seq, &mut unpacked) {
            log::warn!("Truncating shaped text: {}", e);
            truncated = true;
        }

        structural::swap_before_aligned(self.table, &mut unpacked);

        let mut expanded = Vec::with_capacity(unpacked.len());
        if let Err(e) = structural::expand_replacements(self.table, &unpacked, &mut expanded) {
            log::warn!("Truncating shaped text: {}", e);
            truncated = true;
        }

        (expanded, truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph_props::{Align, Directive, GlyphProperty};
    use crate::sheets::CodeRangeRegistry;

    const COMBINING_ACUTE: u32 = 0x0301;
    const COMBINING_CEDILLA: u32 = 0x0327;

    fn table() -> GlyphMetadataTable {
        let mut acute = GlyphProperty::with_width(0);
        acute.write_on_top = Some(0);
        acute.align = Align::Centre;

        let mut cedilla = GlyphProperty::with_width(0);
        cedilla.write_on_top = Some(0);
        cedilla.stack = Stack::Down;

        let mut broken = GlyphProperty::with_width(0);
        broken.directive = Directive {
            opcode: 0x81,
            arg1: 0,
            arg2: 0,
        };
        broken.extra_info = vec!['a' as u32, 0xE_0000, 0, 0, 0, 0, 0];

        let ascii = (0x20..0x7F).map(|c| (c, GlyphProperty::with_width(6)));
        let mut table = GlyphMetadataTable::from_properties(CodeRangeRegistry::builtin().unwrap(), ascii);
        table.insert(COMBINING_ACUTE, acute);
        table.insert(COMBINING_CEDILLA, cedilla);
        table.insert(0x0912, broken);
        table
    }

    #[test]
    fn test_sentinels_bracket_output() {
        let table = table();
        let seq = Normalizer::new(&table).normalize("ab").unwrap();
        assert_eq!(seq.codepoints(), &[SENTINEL, 'a' as u32, 'b' as u32, SENTINEL]);
        assert_eq!(seq.inner(), &['a' as u32, 'b' as u32]);
        assert!(!seq.is_truncated());

        let empty = Normalizer::new(&table).normalize("").unwrap();
        assert_eq!(empty.codepoints(), &[SENTINEL, SENTINEL]);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_unpaired_surrogate_becomes_unknown_glyph() {
        let table = table();
        let seq = Normalizer::new(&table)
            .normalize_utf16(&[0x0041, 0xD800, 0x0042, 0xD83D, 0xDE00])
            .unwrap();
        assert_eq!(seq.inner(), &[0x41, UNKNOWN_GLYPH, 0x42, 0x1F600]);
    }

    #[test]
    fn test_dotted_letters_lose_their_dot_under_marks_above() {
        let table = table();
        let n = Normalizer::new(&table);
        let acute = format!("i{}", char::from_u32(COMBINING_ACUTE).unwrap());
        assert_eq!(n.normalize(&acute).unwrap().inner(), &[0x0131, COMBINING_ACUTE]);

        let cedilla = format!("j{}", char::from_u32(COMBINING_CEDILLA).unwrap());
        assert_eq!(n.normalize(&cedilla).unwrap().inner(), &['j' as u32, COMBINING_CEDILLA]);
    }

    #[test]
    fn test_charset_override_remaps_until_reset() {
        let table = table();
        let text: String = [0x0431, 0xF_FFC1, 0x0431, 0xF_FFC0, 0x0431]
            .iter()
            .filter_map(|&c| char::from_u32(c))
            .collect();
        let seq = Normalizer::new(&table).normalize(&text).unwrap();
        assert_eq!(
            seq.inner(),
            &[0x0431, 0xF_FFC1, 0xF_0031, 0xF_FFC0, 0x0431]
        );
    }

    #[test]
    fn test_instance_charset() {
        let table = table();
        let seq = Normalizer::new(&table)
            .with_charset(CharsetOverride::Codestyle)
            .normalize("a")
            .unwrap();
        assert_eq!(seq.inner(), &[0xF_0520 + ('a' as u32 - 0x20)]);
    }

    #[test]
    fn test_hangul_and_scripts_in_one_text() {
        let table = table();
        let seq = Normalizer::new(&table).normalize("가 க்ஷ").unwrap();
        assert_eq!(seq.inner(), &[0x1100, 0x1161, 0x20, 0xF_00ED]);
    }

    #[test]
    fn test_devanagari_rakar() {
        let table = table();
        let seq = Normalizer::new(&table).normalize("क्र").unwrap();
        assert_eq!(seq.inner(), &[0xF_0320]);
    }

    #[test]
    fn test_corrupt_replacement_truncates() {
        let table = table();
        let text: String = ['x', char::from_u32(0x0912).unwrap(), 'y'].iter().collect();
        let seq = Normalizer::new(&table).normalize(&text).unwrap();
        assert!(seq.is_truncated());
        assert_eq!(seq.inner(), &['x' as u32]);
    }

    #[test]
    fn test_strict_mode_reports_missing_metadata() {
        let table = table();
        let strict = Normalizer::new(&table).with_strict(true);
        assert!(strict.normalize("abc").is_ok());
        assert!(matches!(
            strict.normalize("a\u{4E00}"),
            Err(FontError::MissingGlyphMetadata { codepoint: 0x4E00 })
        ));
        // control codepoints never need metadata
        assert!(strict.normalize("\u{10F0F0}a\u{100000}").is_ok());
        assert!(Normalizer::new(&table).normalize("a\u{4E00}").is_ok());
    }

    #[test]
    fn test_renormalize_is_noop() {
        let table = table();
        let n = Normalizer::new(&table);
        for text in ["Hello", "i\u{301}", "각가", "க்ஷ ஸ்ரீ", "र्क्मि", "कृ", "\u{FFFC1}б"] {
            let once = n.normalize(text).unwrap();
            assert_eq!(n.renormalize(&once).unwrap(), once, "{text}");
        }
    }

    #[test]
    fn test_renormalize_is_noop_for_every_ascii_mark_pair() {
        let table = table();
        let n = Normalizer::new(&table);
        let tails: [&[u32]; 4] = [
            &[COMBINING_ACUTE],
            &[COMBINING_CEDILLA],
            &[COMBINING_ACUTE, COMBINING_CEDILLA],
            &[COMBINING_CEDILLA, COMBINING_ACUTE],
        ];
        for c in 0x20..0x7F {
            for tail in tails {
                let input: Vec<u32> = std::iter::once(c).chain(tail.iter().copied()).collect();
                let once = n.normalize_codepoints(&input).unwrap();
                assert_eq!(n.renormalize(&once).unwrap(), once, "{input:X?}");
            }
        }
    }

    #[test]
    fn test_renormalize_is_noop_for_malformed_jamo_runs() {
        let table = table();
        let n = Normalizer::new(&table);
        // initials, peaks, finals, both fillers, a syllable, a compatibility
        // jamo and a Latin letter
        let alphabet = [
            0x1100,
            0x1112,
            0x1161,
            0x1169,
            0x11A8,
            0x11AB,
            crate::hangul::CHOSEONG_FILLER,
            crate::hangul::JUNGSEONG_FILLER,
            0xAC01,
            0x3131,
            'a' as u32,
        ];

        let mut runs: Vec<Vec<u32>> = alphabet.iter().map(|&c| vec![c]).collect();
        for len in 1..3 {
            let longer: Vec<Vec<u32>> = runs
                .iter()
                .filter(|r| r.len() == len)
                .flat_map(|r| {
                    alphabet.iter().map(move |&c| {
                        let mut next = r.clone();
                        next.push(c);
                        next
                    })
                })
                .collect();
            runs.extend(longer);
        }
        assert_eq!(runs.len(), 11 + 11 * 11 + 11 * 11 * 11);

        for run in &runs {
            let once = n.normalize_codepoints(run).unwrap();
            assert_eq!(n.renormalize(&once).unwrap(), once, "{run:X?}");
        }
    }
}
