//! Devanagari cluster shaping.
//!
//! A run of Devanagari codepoints goes through four sub-passes:
//! 1. consonants to internal presentation forms, nukta merging;
//! 2. reph extraction (a cluster-initial RA + virama is held back and
//!    re-emitted as a superscript mark where the cluster ends);
//! 3. conjuncts, rakar forms, eyelash RA, half forms and the RA/RRA/HA
//!    + U/UU syllables;
//! 4. I and II matra length variants.
//!
//! Everything this module emits is already in internal form, so shaping
//! the output again leaves it unchanged.

use crate::codepoints::{ZWJ, ZWNJ};
use crate::metadata::GlyphMetadataTable;

pub const VIRAMA: u32 = 0x094D;
pub const NUKTA: u32 = 0x093C;
pub const VOWEL_SIGN_I: u32 = 0x093F;
pub const VOWEL_SIGN_II: u32 = 0x0940;
pub const VOWEL_SIGN_U: u32 = 0x0941;
pub const VOWEL_SIGN_UU: u32 = 0x0942;

pub const SYLLABLE_RU: u32 = 0xF_0100;
pub const SYLLABLE_RUU: u32 = 0xF_0101;
pub const SYLLABLE_RRU: u32 = 0xF_0102;
pub const SYLLABLE_RRUU: u32 = 0xF_0103;
pub const SYLLABLE_HU: u32 = 0xF_0104;
pub const SYLLABLE_HUU: u32 = 0xF_0105;
pub const HALF_RYA: u32 = 0xF_0107;
pub const OPEN_HALF_YA: u32 = 0xF_0109;
pub const EYELASH_RA: u32 = 0xF_010B;
pub const REPH: u32 = 0xF_010C;
/// Reph over a cluster that carries a vowel sign.
pub const REPH_COMPLEX: u32 = 0xF_010D;

/// First I-matra length variant; sixteen follow.
pub const I_MATRA_VARIANTS: u32 = 0xF_0110;
/// Last II-matra length variant; variants count down from here.
pub const II_MATRA_VARIANTS_END: u32 = 0xF_012F;

const INTERNAL_BASE: u32 = 0xF_0140;
const HALF_OFFSET: u32 = 240;
const RAKAR_OFFSET: u32 = 480;
const NUKTA_OFFSET: u32 = 48;

const NUQTA_LETTERS: [u32; 8] = [
    0xF_0170, 0xF_0171, 0xF_0172, 0xF_0177, 0xF_017C, 0xF_017D, 0xF_0186, 0xF_018A,
];

pub const KA: u32 = internal(0x0915);
pub const RA: u32 = internal(0x0930);
pub const RRA: u32 = internal(0x0931);
pub const HA: u32 = internal(0x0939);

/// Internal form of a plain consonant U+0915..=U+0939.
const fn internal(c: u32) -> u32 {
    c - 0x0915 + INTERNAL_BASE
}

/// `C1 virama C2 → ligature`, keyed by Unicode consonants.
const CONJUNCTS: &[(u32, u32, u32)] = &[
    (0x0915, 0x0924, 0xF_01BC), // K.T
    (0x0915, 0x0937, 0xF_01A1), // K.SS
    (0x0918, 0x091F, 0xF_01BD),
    (0x0918, 0x0920, 0xF_01BE),
    (0x0918, 0x0922, 0xF_01BF),
    (0x0919, 0x0915, 0xF_01CE),
    (0x0919, 0x0916, 0xF_01CF),
    (0x0919, 0x0917, 0xF_01D2),
    (0x0919, 0x0918, 0xF_01D3),
    (0x0919, 0x0928, 0xF_01CD),
    (0x0919, 0x092E, 0xF_01D4),
    (0x091B, 0x0935, 0xF_01D5),
    (0x091C, 0x091E, 0xF_01A2), // J.NY
    (0x091C, 0x092F, 0xF_01AB),
    (0x091F, 0x0915, 0xF_01E0),
    (0x091F, 0x091F, 0xF_01D6),
    (0x091F, 0x0920, 0xF_01D7),
    (0x091F, 0x092A, 0xF_01E1),
    (0x091F, 0x0935, 0xF_01D8),
    (0x091F, 0x0936, 0xF_01E2),
    (0x091F, 0x0938, 0xF_01E3),
    (0x0920, 0x0920, 0xF_01D9),
    (0x0920, 0x0935, 0xF_01DA),
    (0x0921, 0x0917, 0xF_01D0),
    (0x0921, 0x0921, 0xF_01DB),
    (0x0921, 0x0922, 0xF_01DC),
    (0x0921, 0x092D, 0xF_01D1),
    (0x0921, 0x0935, 0xF_01DD),
    (0x0922, 0x0922, 0xF_01DE),
    (0x0922, 0x0935, 0xF_01DF),
    (0x0924, 0x0924, 0xF_01A3),
    (0x0926, 0x0917, 0xF_01B0),
    (0x0926, 0x0918, 0xF_01B1),
    (0x0926, 0x0926, 0xF_01B2),
    (0x0926, 0x0927, 0xF_01B3),
    (0x0926, 0x0928, 0xF_01B4),
    (0x0926, 0x092C, 0xF_01B5),
    (0x0926, 0x092D, 0xF_01B6),
    (0x0926, 0x092E, 0xF_01B7),
    (0x0926, 0x092F, 0xF_01B8),
    (0x0926, 0x0935, 0xF_01B9),
    (0x0928, 0x0924, 0xF_01A4),
    (0x0928, 0x0928, 0xF_01A5),
    (0x092A, 0x091F, 0xF_01C0),
    (0x092A, 0x0920, 0xF_01C1),
    (0x092A, 0x0922, 0xF_01C2),
    (0x0936, 0x091A, 0xF_01A8),
    (0x0936, 0x0928, 0xF_01A9),
    (0x0936, 0x0935, 0xF_01AA),
    (0x0937, 0x091F, 0xF_01C3),
    (0x0937, 0x0920, 0xF_01C4),
    (0x0937, 0x0922, 0xF_01C5),
    (0x0937, 0x092A, 0xF_01A7),
    (0x0938, 0x0935, 0xF_01A6),
    (0x0939, 0x0923, 0xF_01C6),
    (0x0939, 0x0928, 0xF_01C7),
    (0x0939, 0x092E, 0xF_01C8),
    (0x0939, 0x092F, 0xF_01C9),
    (0x0939, 0x0932, 0xF_01CA),
    (0x0939, 0x0935, 0xF_01CB),
];

/// `consonant + U/UU` syllables recommended by Unicode.
const SYLLABLES: [(u32, u32, u32); 6] = [
    (RA, VOWEL_SIGN_U, SYLLABLE_RU),
    (RA, VOWEL_SIGN_UU, SYLLABLE_RUU),
    (RRA, VOWEL_SIGN_U, SYLLABLE_RRU),
    (RRA, VOWEL_SIGN_UU, SYLLABLE_RRUU),
    (HA, VOWEL_SIGN_U, SYLLABLE_HU),
    (HA, VOWEL_SIGN_UU, SYLLABLE_HUU),
];

// ============================================================================
// Classification
// ============================================================================

/// Codepoints a Devanagari run is made of, joiners aside.
pub fn is_devanagari(c: u32) -> bool {
    (0x0900..=0x097F).contains(&c) || (0xF_0100..=0xF_04FF).contains(&c)
}

/// Full consonant forms: plain, nukta, conjunct and rakar.
pub fn is_full_consonant(c: u32) -> bool {
    (0xF_0140..0xF_0230).contains(&c) || (0xF_0320..0xF_0410).contains(&c)
}

pub fn is_half_form(c: u32) -> bool {
    (0xF_0230..0xF_0320).contains(&c)
        || (0xF_0410..0xF_0500).contains(&c)
        || matches!(c, EYELASH_RA | HALF_RYA | OPEN_HALF_YA)
}

pub fn is_vowel_sign(c: u32) -> bool {
    matches!(
        c,
        0x0900..=0x0903 | 0x093A..=0x093B | 0x093E..=0x094C | 0x094E..=0x094F | 0x0955..=0x0957
    ) || (I_MATRA_VARIANTS..=II_MATRA_VARIANTS_END).contains(&c)
}

/// Pre-positioned I-matra variants, which must not take part in the
/// before-aligned swap.
pub fn is_i_matra_variant(c: u32) -> bool {
    (I_MATRA_VARIANTS..I_MATRA_VARIANTS + 16).contains(&c)
}

fn to_internal(c: u32) -> u32 {
    match c {
        0x0915..=0x0939 => internal(c),
        0x0958..=0x095F => NUQTA_LETTERS[(c - 0x0958) as usize],
        _ => c,
    }
}

fn conjunct(c1: u32, c2: u32) -> Option<u32> {
    CONJUNCTS
        .iter()
        .find(|(a, b, _)| internal(*a) == c1 && internal(*b) == c2)
        .map(|(_, _, lig)| *lig)
}

fn syllable(c: u32, sign: u32) -> Option<u32> {
    SYLLABLES
        .iter()
        .find(|(cons, v, _)| *cons == c && *v == sign)
        .map(|(_, _, s)| *s)
}

// ============================================================================
// Reph state machine
// ============================================================================

/// Progress through the cluster a held reph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RaState {
    /// RA + virama held, nothing after it yet
    None,
    ConsonantSeen,
    ViramaSeen,
    VowelSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputClass {
    Consonant,
    Virama,
    Vowel,
    Other,
}

impl InputClass {
    fn of(c: u32) -> Self {
        if is_full_consonant(c) {
            InputClass::Consonant
        } else if c == VIRAMA {
            InputClass::Virama
        } else if is_vowel_sign(c) {
            InputClass::Vowel
        } else {
            InputClass::Other
        }
    }
}

/// `(state, input) → next state`; `None` flushes the reph before the input.
/// Rows follow `RaState`, columns follow `InputClass`.
const RA_TRANSITIONS: [[Option<RaState>; 4]; 4] = [
    // None
    [Some(RaState::ConsonantSeen), None, None, None],
    // ConsonantSeen
    [None, Some(RaState::ViramaSeen), Some(RaState::VowelSeen), None],
    // ViramaSeen
    [Some(RaState::ConsonantSeen), None, None, None],
    // VowelSeen
    [None, None, Some(RaState::VowelSeen), None],
];

fn ra_transition(state: RaState, input: InputClass) -> Option<RaState> {
    let row = match state {
        RaState::None => 0,
        RaState::ConsonantSeen => 1,
        RaState::ViramaSeen => 2,
        RaState::VowelSeen => 3,
    };
    let col = match input {
        InputClass::Consonant => 0,
        InputClass::Virama => 1,
        InputClass::Vowel => 2,
        InputClass::Other => 3,
    };
    RA_TRANSITIONS[row][col]
}

fn reph_for(state: RaState) -> u32 {
    if state == RaState::VowelSeen {
        REPH_COMPLEX
    } else {
        REPH
    }
}

// ============================================================================
// Sub-passes
// ============================================================================

/// Shape one run of Devanagari codepoints into `out`.
pub fn shape_run(table: &GlyphMetadataTable, run: &[u32], out: &mut Vec<u32>) {
    let mapped = map_consonants(run);
    let with_reph = extract_reph(&mapped);
    let ligated = ligate(&with_reph);
    place_matras(table, &ligated, out);
}

fn map_consonants(run: &[u32]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(run.len());
    for &c in run {
        if c == NUKTA
            && let Some(last) = out.last_mut()
            && (INTERNAL_BASE..INTERNAL_BASE + 0x25).contains(&*last)
        {
            *last += NUKTA_OFFSET;
            continue;
        }
        out.push(to_internal(c));
    }
    out
}

/// Move cluster-initial `RA virama` behind its cluster as a reph.
fn extract_reph(run: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(run.len());
    let mut held: Option<RaState> = None;
    let mut i = 0;

    while i < run.len() {
        let c = run[i];

        if let Some(state) = held {
            match ra_transition(state, InputClass::of(c)) {
                Some(next) => held = Some(next),
                None => {
                    out.push(reph_for(state));
                    held = None;
                    continue;
                }
            }
            out.push(c);
            i += 1;
            continue;
        }

        let at_cluster_start = i == 0 || run[i - 1] != VIRAMA;
        if c == RA
            && at_cluster_start
            && run.get(i + 1) == Some(&VIRAMA)
            && run.get(i + 2).is_some_and(|&n| is_full_consonant(n))
        {
            held = Some(RaState::None);
            i += 2;
            continue;
        }

        out.push(c);
        i += 1;
    }

    if let Some(state) = held {
        out.push(reph_for(state));
    }
    out
}

/// Conjuncts, rakar, eyelash RA, half forms and syllables.
fn ligate(run: &[u32]) -> Vec<u32> {
    let mut buf = run.to_vec();
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;

    while i < buf.len() {
        let c = buf[i];
        let n1 = buf.get(i + 1).copied();
        let n2 = buf.get(i + 2).copied();

        if !is_full_consonant(c) {
            out.push(c);
            i += 1;
            continue;
        }

        if n1 == Some(VIRAMA) {
            if (c == RA && n2 == Some(ZWJ)) || c == RRA {
                out.push(EYELASH_RA);
                i += if c == RA { 3 } else { 2 };
                continue;
            }
            if let Some(lig) = n2.and_then(|n| conjunct(c, n)) {
                buf[i + 2] = lig;
                i += 2;
                continue;
            }
            if n2 == Some(RA) && c < INTERNAL_BASE + RAKAR_OFFSET {
                buf[i + 2] = c + RAKAR_OFFSET;
                i += 2;
                continue;
            }
            if n2.is_some_and(is_full_consonant) {
                out.push(c + HALF_OFFSET);
                i += 2;
                continue;
            }
            if n2 == Some(ZWJ) {
                out.push(c + HALF_OFFSET);
                i += 3;
                continue;
            }
        }

        if let Some(s) = n1.and_then(|n| syllable(c, n)) {
            out.push(s);
            i += 2;
            continue;
        }

        out.push(c);
        i += 1;
    }
    out
}

fn anchor_x(table: &GlyphMetadataTable, c: u32) -> i32 {
    table
        .get_or_default(c)
        .anchor(0)
        .filter(|a| a.x_used)
        .map_or(0, |a| i32::from(a.x))
}

/// Pick matra length variants from the width of the cluster they cover.
fn place_matras(table: &GlyphMetadataTable, run: &[u32], out: &mut Vec<u32>) {
    let run_start = out.len();
    let mut cluster_start: Option<usize> = None;

    for &c in run {
        let last = out.get(run_start..).and_then(|s| s.last()).copied();

        if c == VOWEL_SIGN_I
            && let (Some(start), Some(base)) = (cluster_start, last.filter(|&b| is_full_consonant(b)))
        {
            let half_widths: i32 = out[start..out.len() - 1]
                .iter()
                .map(|&h| table.get_or_default(h).width)
                .sum();
            let idx = (half_widths + anchor_x(table, base) + 2).clamp(6, 21) - 6;
            out.insert(start, I_MATRA_VARIANTS + idx as u32);
            cluster_start = None;
            continue;
        }

        if c == VOWEL_SIGN_II
            && let Some(base) = last.filter(|&b| is_full_consonant(b))
        {
            let w = table.get_or_default(base).width - anchor_x(table, base);
            let idx = (w + 1).clamp(4, 19) - 4;
            out.push(II_MATRA_VARIANTS_END - idx as u32);
            cluster_start = None;
            continue;
        }

        if is_full_consonant(c) || is_half_form(c) {
            if !last.is_some_and(is_half_form) {
                cluster_start = Some(out.len());
            }
        } else if c != ZWNJ {
            cluster_start = None;
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph_props::{DiacriticAnchor, GlyphProperty};
    use crate::sheets::CodeRangeRegistry;

    const MA: u32 = internal(0x092E);

    fn table() -> GlyphMetadataTable {
        let mut ka = GlyphProperty::with_width(10);
        ka.anchors[0] = DiacriticAnchor {
            kind: 0,
            x: 6,
            y: 0,
            x_used: true,
            y_used: false,
        };
        GlyphMetadataTable::from_properties(
            CodeRangeRegistry::builtin().unwrap(),
            [(KA, ka), (KA + HALF_OFFSET, GlyphProperty::with_width(5))],
        )
    }

    fn shape(run: &[u32]) -> Vec<u32> {
        let mut out = Vec::new();
        shape_run(&table(), run, &mut out);
        out
    }

    #[test]
    fn test_consonants_map_to_internal_forms() {
        assert_eq!(shape(&[0x0915]), vec![KA]);
        assert_eq!(shape(&[0x0939]), vec![HA]);
        assert_eq!(shape(&[0x0958]), vec![0xF_0170]);
    }

    #[test]
    fn test_nukta_merges() {
        assert_eq!(shape(&[0x0915, NUKTA]), vec![KA + NUKTA_OFFSET]);
        // nukta after a vowel stays put
        assert_eq!(shape(&[0x0905, NUKTA]), vec![0x0905, NUKTA]);
    }

    #[test]
    fn test_rakar_is_one_codepoint() {
        assert_eq!(shape(&[0x0915, VIRAMA, 0x0930]), vec![KA + RAKAR_OFFSET]);
    }

    #[test]
    fn test_conjuncts() {
        assert_eq!(shape(&[0x0915, VIRAMA, 0x0937]), vec![0xF_01A1]);
        assert_eq!(shape(&[0x091C, VIRAMA, 0x091E]), vec![0xF_01A2]);
        assert_eq!(shape(&[0x0924, VIRAMA, 0x0924]), vec![0xF_01A3]);
    }

    #[test]
    fn test_half_forms() {
        assert_eq!(shape(&[0x0915, VIRAMA, 0x092E]), vec![KA + HALF_OFFSET, MA]);
        assert_eq!(shape(&[0x0915, VIRAMA, ZWJ]), vec![KA + HALF_OFFSET]);
        // conjunct followed by virama and a consonant takes the half form too
        assert_eq!(
            shape(&[0x0915, VIRAMA, 0x0937, VIRAMA, 0x092E]),
            vec![0xF_01A1 + HALF_OFFSET, MA]
        );
    }

    #[test]
    fn test_trailing_virama_stays() {
        assert_eq!(shape(&[0x0915, VIRAMA]), vec![KA, VIRAMA]);
    }

    #[test]
    fn test_eyelash_ra() {
        assert_eq!(shape(&[0x0930, VIRAMA, ZWJ]), vec![EYELASH_RA]);
        assert_eq!(shape(&[0x0931, VIRAMA, 0x092E]), vec![EYELASH_RA, MA]);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(shape(&[0x0930, VOWEL_SIGN_U]), vec![SYLLABLE_RU]);
        assert_eq!(shape(&[0x0931, VOWEL_SIGN_UU]), vec![SYLLABLE_RRUU]);
        assert_eq!(shape(&[0x0939, VOWEL_SIGN_U]), vec![SYLLABLE_HU]);
    }

    #[test]
    fn test_reph_moves_behind_cluster() {
        assert_eq!(shape(&[0x0930, VIRAMA, 0x092E]), vec![MA, REPH]);
        assert_eq!(
            shape(&[0x0930, VIRAMA, 0x0915, VIRAMA, 0x092E, 0x0020]),
            vec![KA + HALF_OFFSET, MA, REPH, 0x0020]
        );
    }

    #[test]
    fn test_reph_with_vowel_sign_is_complex() {
        assert_eq!(shape(&[0x0930, VIRAMA, 0x092E, 0x093E]), vec![MA, 0x093E, REPH_COMPLEX]);
    }

    #[test]
    fn test_reph_transition_table() {
        use InputClass::*;
        assert_eq!(ra_transition(RaState::None, Consonant), Some(RaState::ConsonantSeen));
        assert_eq!(ra_transition(RaState::ConsonantSeen, Virama), Some(RaState::ViramaSeen));
        assert_eq!(ra_transition(RaState::ViramaSeen, Consonant), Some(RaState::ConsonantSeen));
        assert_eq!(ra_transition(RaState::ConsonantSeen, Vowel), Some(RaState::VowelSeen));
        assert_eq!(ra_transition(RaState::VowelSeen, Consonant), None);
        assert_eq!(ra_transition(RaState::ViramaSeen, Other), None);
    }

    #[test]
    fn test_i_matra_goes_before_cluster() {
        // anchor 6 + 2 → variant 2
        assert_eq!(shape(&[0x0915, VOWEL_SIGN_I]), vec![I_MATRA_VARIANTS + 2, KA]);
        // half KA (width 5) widens the cluster: 5 + 6 + 2 - 6 = 7
        assert_eq!(
            shape(&[0x0915, VIRAMA, 0x0915, VOWEL_SIGN_I]),
            vec![I_MATRA_VARIANTS + 7, KA + HALF_OFFSET, KA]
        );
    }

    #[test]
    fn test_ii_matra_variant() {
        // width 10 - anchor 6 + 1 = 5 → 5 - 4 = 1
        assert_eq!(shape(&[0x0915, VOWEL_SIGN_II]), vec![KA, II_MATRA_VARIANTS_END - 1]);
        // without a base the sign is left alone
        assert_eq!(shape(&[0x0905, VOWEL_SIGN_II]), vec![0x0905, VOWEL_SIGN_II]);
    }

    #[test]
    fn test_reshaping_is_stable() {
        let runs: [&[u32]; 5] = [
            &[0x0915, VIRAMA, 0x0930],
            &[0x0930, VIRAMA, 0x0915, VIRAMA, 0x092E, 0x093F],
            &[0x0915, VIRAMA, 0x0937, VOWEL_SIGN_II],
            &[0x0931, VIRAMA, 0x092E],
            &[0x0939, VOWEL_SIGN_UU, 0x0902],
        ];
        for run in runs {
            let once = shape(run);
            assert_eq!(shape(&once), once, "{run:X?}");
        }
    }
}
