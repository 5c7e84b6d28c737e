//! Hangul jamo classification, syllable arithmetic and sprite-row selection.
//!
//! A precomposed syllable U+AC00..=U+D7A3 is `((initial * 21) + peak) * 28 +
//! final`. The jamo sheet stores every component in several shape variants;
//! which row a component is drawn from depends on its neighbours in the
//! syllable.

use std::ops::RangeInclusive;

pub const SYLLABLE_BASE: u32 = 0xAC00;
pub const SYLLABLE_LAST: u32 = 0xD7A3;
pub const JUNG_COUNT: u32 = 21;
pub const JONG_COUNT: u32 = 28;

pub const CHOSEONG_BASE: u32 = 0x1100;
pub const JUNGSEONG_BASE: u32 = 0x1161;
pub const JONGSEONG_BASE: u32 = 0x11A8;

/// Choseong filler, stands in for a missing initial.
pub const CHOSEONG_FILLER: u32 = 0x115F;
/// Jungseong filler, stands in for a missing peak.
pub const JUNGSEONG_FILLER: u32 = 0x1160;

const JUNGSEONG_I: &[u32] = &[21, 61];
const JUNGSEONG_OU: &[u32] = &[9, 13, 14, 18, 34, 35, 39, 45, 51, 53, 54, 64, 73, 80, 83];
const JUNGSEONG_OU_COMPLEX: &[u32] = &[
    10, 11, 16, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 36, 37, 38, 41, 42, 43, 44, 46,
    47, 48, 49, 50, 56, 57, 58, 59, 63, 67, 68, 69, 70, 71, 72, 74, 75, 76, 77, 78, 79, 81, 82,
    83, 85, 86, 87, 88, 89, 90, 91, 93, 94,
];
const JUNGSEONG_RIGHTIE: &[u32] = &[
    2, 4, 6, 8, 11, 16, 32, 33, 37, 42, 44, 48, 50, 71, 72, 75, 78, 79, 83, 86, 87, 88, 94,
];
const JUNGSEONG_OEWI: &[u32] = &[12, 15, 17, 40, 52, 55, 89, 90, 91];
const JUNGSEONG_EU: &[u32] = &[19, 62, 66];
const JUNGSEONG_YI: &[u32] = &[20, 60, 65];
const JUNGSEONG_UU: &[u32] = &[
    14, 15, 16, 17, 18, 27, 30, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 59,
    67, 68, 73, 77, 78, 79, 80, 81, 82, 83, 84, 91,
];
const CHOSEONG_GIYEOKS: &[u32] = &[
    0, 1, 15, 23, 30, 34, 45, 51, 56, 65, 82, 90, 100, 101, 110, 111, 115,
];

/// Peaks whose glyph reaches one pixel past the base cell.
pub const PEAKS_WITH_EXTRA_WIDTH: &[u32] = &[
    2, 4, 6, 8, 11, 16, 32, 33, 37, 42, 44, 48, 50, 71, 75, 78, 79, 83, 86, 87, 88, 94,
];

// ============================================================================
// Classification
// ============================================================================

pub fn is_syllable(c: u32) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&c)
}

pub fn is_choseong(c: u32) -> bool {
    (0x1100..=0x115F).contains(&c) || (0xA960..=0xA97F).contains(&c)
}

pub fn is_jungseong(c: u32) -> bool {
    (0x1160..=0x11A7).contains(&c) || (0xD7B0..=0xD7C6).contains(&c)
}

pub fn is_jongseong(c: u32) -> bool {
    (0x11A8..=0x11FF).contains(&c) || (0xD7CB..=0xD7FB).contains(&c)
}

/// Hangul Compatibility Jamo, drawn at the syllable width.
pub const COMPAT_JAMO: RangeInclusive<u32> = 0x3130..=0x318F;

/// Any conjoining jamo (initial, peak or final).
pub fn is_jamo(c: u32) -> bool {
    is_choseong(c) || is_jungseong(c) || is_jongseong(c)
}

// ============================================================================
// Indices
// ============================================================================

pub fn choseong_index(c: u32) -> Option<u32> {
    match c {
        0x1100..=0x115F => Some(c - 0x1100),
        0xA960..=0xA97F => Some(c - 0xA960 + 96),
        _ => None,
    }
}

/// Peak index, counting the filler as 0.
pub fn jungseong_index(c: u32) -> Option<u32> {
    match c {
        0x1160..=0x11A7 => Some(c - 0x1160),
        0xD7B0..=0xD7C6 => Some(c - 0xD7B0 + 72),
        _ => None,
    }
}

/// Final index, 0 meaning "no final".
pub fn jongseong_index(c: u32) -> Option<u32> {
    match c {
        0x11A8..=0x11FF => Some(c - 0x11A8 + 1),
        0xD7CB..=0xD7FB => Some(c - 0xD7CB + 88 + 1),
        _ => None,
    }
}

/// Split a precomposed syllable into `(initial, peak, final)` indices.
pub fn decompose_indices(c: u32) -> Option<(u32, u32, u32)> {
    if !is_syllable(c) {
        return None;
    }
    let idx = c - SYLLABLE_BASE;
    Some((
        idx / (JUNG_COUNT * JONG_COUNT),
        idx / JONG_COUNT % JUNG_COUNT,
        idx % JONG_COUNT,
    ))
}

/// Inverse of [`decompose_indices`] over the modern jamo set.
pub fn compose_indices(initial: u32, peak: u32, fin: u32) -> Option<u32> {
    if initial >= 19 || peak >= JUNG_COUNT || fin >= JONG_COUNT {
        return None;
    }
    Some(SYLLABLE_BASE + (initial * JUNG_COUNT + peak) * JONG_COUNT + fin)
}

/// Split a precomposed syllable into its conjoining jamo codepoints.
pub fn decompose(c: u32) -> Option<[Option<u32>; 3]> {
    let (i, p, f) = decompose_indices(c)?;
    Some([
        Some(CHOSEONG_BASE + i),
        Some(JUNGSEONG_BASE + p),
        (f > 0).then(|| JONGSEONG_BASE + f - 1),
    ])
}

// ============================================================================
// Sprite rows
// ============================================================================

/// Row of the initial's shape variant, chosen by the peak's shape class and
/// whether a final follows.
pub fn initial_row(i: u32, p: u32, f: u32) -> u32 {
    let mut row = if JUNGSEONG_I.contains(&p) {
        3
    } else if JUNGSEONG_OEWI.contains(&p) {
        11
    } else if JUNGSEONG_OU_COMPLEX.contains(&p) {
        7
    } else if JUNGSEONG_OU.contains(&p) {
        5
    } else if JUNGSEONG_EU.contains(&p) {
        9
    } else if JUNGSEONG_YI.contains(&p) {
        13
    } else {
        1
    };

    if f != 0 {
        row += 1;
    }

    // Giyeok-like initials under a u-shaped vowel use the shortened forms
    if JUNGSEONG_UU.contains(&p) && CHOSEONG_GIYEOKS.contains(&i) {
        row = match row {
            5 => 19,
            6 => 20,
            7 => 21,
            8 => 22,
            11 => 23,
            12 => 24,
            other => other,
        };
    }
    row
}

pub fn peak_row(f: u32) -> u32 {
    if f == 0 { 15 } else { 16 }
}

pub fn final_row(p: u32) -> u32 {
    if JUNGSEONG_RIGHTIE.contains(&p) { 18 } else { 17 }
}

/// Rows for all three components of a syllable, from index triplets as
/// returned by the `*_index` functions.
pub fn jamo_rows(i: u32, p: u32, f: u32) -> (u32, u32, u32) {
    (initial_row(i, p, f), peak_row(f), final_row(p))
}

/// Whether a peak widens its syllable by one pixel.
pub fn peak_has_extra_width(p: u32) -> bool {
    PEAKS_WITH_EXTRA_WIDTH.contains(&p)
}

/// Whether a peak belongs to the wide o/u/eu family.
pub fn is_wide_peak(p: u32) -> bool {
    JUNGSEONG_OU.contains(&p) || JUNGSEONG_EU.contains(&p)
}

/// Cell of a jamo's standalone glyph: initials on row 1, peaks on row 15,
/// finals on row 17.
pub fn jamo_default_cell(c: u32) -> Option<(u32, u32)> {
    if let Some(i) = choseong_index(c) {
        return Some((i, 1));
    }
    if let Some(p) = jungseong_index(c) {
        return Some((p, 15));
    }
    jongseong_index(c).map(|f| (f, 17))
}
