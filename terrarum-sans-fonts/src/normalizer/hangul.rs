//! Hangul syllable decomposition and jamo repair.

use crate::hangul::{
    self, CHOSEONG_FILLER, JUNGSEONG_FILLER, is_choseong, is_jongseong, is_jungseong,
};

/// Whether the Hangul rule handles `c`.
pub fn applies(c: u32) -> bool {
    hangul::is_syllable(c) || hangul::is_jamo(c)
}

/// Emit `c` as a well-formed run of initial, peak and optional final.
///
/// Precomposed syllables are split; a stray initial gets a filler peak, a
/// stray peak a filler initial, and a stray final both.
pub fn push(out: &mut Vec<u32>, c: u32, next: Option<u32>) {
    if let Some(jamo) = hangul::decompose(c) {
        out.extend(jamo.into_iter().flatten());
        return;
    }

    let last = out.last().copied();
    if is_choseong(c) {
        out.push(c);
        if !next.is_some_and(is_jungseong) {
            out.push(JUNGSEONG_FILLER);
        }
    } else if is_jungseong(c) {
        if !last.is_some_and(is_choseong) {
            out.push(CHOSEONG_FILLER);
        }
        out.push(c);
    } else if is_jongseong(c) {
        if !last.is_some_and(is_jungseong) {
            out.extend([CHOSEONG_FILLER, JUNGSEONG_FILLER]);
        }
        out.push(c);
    } else {
        out.push(c);
    }
}
