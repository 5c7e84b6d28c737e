//! Pen positions for a normalised sequence.
//!
//! One forward pass keeps the index of the last base glyph (the last glyph
//! that advanced the pen), the up/down stacking counters of the diacritics
//! drawn over it and the nudge carried over from it. Diacritics never move
//! the pen; Hangul peaks and finals sit at the X of their initial.

use crate::codepoints::{self, SENTINEL};
use crate::error::Result;
use crate::glyph_props::{Align, GlyphProperty, Stack};
use crate::hangul;
use crate::kerning::KerningEngine;
use crate::metadata::GlyphMetadataTable;
use crate::normalizer::NormalizedSequence;
use crate::sheets::{SHEET_CYRILIC_VARW, SHEET_DIACRITICAL_MARKS_VARW, SheetId, W_VAR_INIT};

pub const HALF_VAR_INIT: i32 = 7;
/// Vertical pitch between stacked diacritics.
pub const H_DIACRITICS: i32 = 3;
/// Drop applied to stacking marks over a low-height base.
pub const LOW_HEIGHT_SHIFT_STACKED: i32 = 4;
/// Drop applied to overlay marks over a low-height base.
pub const LOW_HEIGHT_SHIFT_OVERLAY: i32 = 2;
/// Width of a Hangul syllable block.
pub const W_HANGUL_SYLLABLE: i32 = 13;

/// Sheets whose marks are drawn for tall letters and must be lowered over
/// low-height ones.
const AUTO_SHIFT_SHEETS: [SheetId; 2] = [SHEET_DIACRITICAL_MARKS_VARW, SHEET_CYRILIC_VARW];

/// Per-glyph pen positions, aligned with [`NormalizedSequence::codepoints`].
///
/// `pos_x` has one more entry than there are codepoints: the last one is
/// the total advance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionMap {
    pub pos_x: Vec<i32>,
    pub pos_y: Vec<i32>,
}

impl PositionMap {
    /// Total advance width.
    pub fn total_width(&self) -> i32 {
        self.pos_x.last().copied().unwrap_or(0)
    }

    /// Number of positioned codepoints, sentinels included.
    pub fn len(&self) -> usize {
        self.pos_y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_y.is_empty()
    }

    /// Every position multiplied by an integer scale, saturating at the
    /// `i32` range.
    pub fn scaled(&self, scale: i32) -> Self {
        Self {
            pos_x: self.pos_x.iter().map(|x| x.saturating_mul(scale)).collect(),
            pos_y: self.pos_y.iter().map(|y| y.saturating_mul(scale)).collect(),
        }
    }
}

/// Computes [`PositionMap`]s against one metadata table.
#[derive(Debug, Clone, Copy)]
pub struct PositionBuilder<'a> {
    table: &'a GlyphMetadataTable,
    kerning: &'a KerningEngine,
    kerning_enabled: bool,
    interchar: i32,
    strict: bool,
}

/// State carried across the pass.
struct Pass<'p> {
    base: usize,
    base_prop: &'p GlyphProperty,
    base_advance: i32,
    up: i32,
    down: i32,
    /// Nudge of the base, returned to the glyph after it
    extra: i32,
    /// Rightmost point reached by diacritics over the base, relative to it
    diacritic_extent: i32,
    /// Index of the Hangul initial the following peak and final attach to
    initial: Option<usize>,
}

impl<'a> PositionBuilder<'a> {
    pub fn new(table: &'a GlyphMetadataTable, kerning: &'a KerningEngine) -> Self {
        Self {
            table,
            kerning,
            kerning_enabled: true,
            interchar: 0,
            strict: false,
        }
    }

    pub fn with_kerning(mut self, enabled: bool) -> Self {
        self.kerning_enabled = enabled;
        self
    }

    /// Extra spacing between consecutive base glyphs.
    pub fn with_interchar(mut self, interchar: i32) -> Self {
        self.interchar = interchar;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(&self, seq: &NormalizedSequence) -> Result<PositionMap> {
        let cps = seq.codepoints();
        let n = cps.len();
        let mut pos_x = vec![0; n + 1];
        let mut pos_y = vec![0; n];

        if seq.is_empty() {
            return Ok(PositionMap { pos_x, pos_y });
        }

        let sentinel = self.table.get_or_default(SENTINEL);
        let mut pass = Pass {
            base: 0,
            base_prop: sentinel,
            base_advance: 0,
            up: 0,
            down: 0,
            extra: 0,
            diacritic_extent: 0,
            initial: None,
        };

        for i in 1..n {
            let c = cps[i];
            let pen = pos_x[pass.base] + pass.base_advance + pass.extra;

            if i == n - 1 || codepoints::is_control(c) {
                pos_x[i] = pen;
                continue;
            }

            let prop = self.table.lookup(c, self.strict)?;

            if let Some(initial) = pass.initial
                && (hangul::is_jungseong(c) || hangul::is_jongseong(c))
            {
                pos_x[i] = pos_x[initial];
                pos_y[i] = -prop.nudge_y;
                continue;
            }

            if let Some(kind) = prop.write_on_top {
                let base_x = pos_x[pass.base];
                let (x, y) = self.place_diacritic(&mut pass, base_x, c, prop, kind);
                pos_x[i] = x;
                pos_y[i] = y;
                pass.diacritic_extent = pass.diacritic_extent.max(x + prop.width - base_x);
                continue;
            }

            let spacing = if pass.base == 0 { 0 } else { self.interchar };
            let kern = if self.kerning_enabled && pass.base != 0 {
                self.kerning
                    .adjustment(cps[pass.base], pass.base_prop, c, prop)
            } else {
                0
            };

            pos_x[i] = pen + spacing + kern - prop.nudge_x;
            pos_y[i] = -prop.nudge_y;

            pass.initial = hangul::is_choseong(c).then_some(i);
            pass.base_advance = if pass.initial.is_some() {
                hangul_advance(cps, i)
            } else {
                prop.advance()
            };
            pass.base = i;
            pass.base_prop = prop;
            pass.up = 0;
            pass.down = 0;
            pass.extra = prop.nudge_x;
            pass.diacritic_extent = 0;
        }

        // a run with nothing visible keeps its zero advance
        let pen = pos_x[pass.base] + pass.extra;
        pos_x[n] = if pass.base == 0 && pass.diacritic_extent == 0 {
            pen + pass.base_advance
        } else {
            pen + pass.base_advance.max(pass.diacritic_extent) + 1
        };

        Ok(PositionMap { pos_x, pos_y })
    }

    fn place_diacritic(
        &self,
        pass: &mut Pass<'_>,
        base_x: i32,
        c: u32,
        prop: &GlyphProperty,
        kind: u8,
    ) -> (i32, i32) {
        let base = pass.base_prop;
        let reference = match base.anchor(kind).filter(|a| a.x_used) {
            Some(anchor) => base_x + i32::from(anchor.x),
            None => match prop.align {
                Align::Centre => base_x + (base.width + 1).div_euclid(2),
                Align::Right => base_x + base.width,
                Align::Left | Align::Before => base_x,
            },
        };
        let x = match prop.align {
            Align::Centre => reference - HALF_VAR_INIT,
            Align::Right => reference - W_VAR_INIT as i32,
            Align::Left | Align::Before => reference,
        } - prop.nudge_x;

        let mut y = match prop.stack {
            Stack::Up => {
                let y = -H_DIACRITICS * pass.up;
                pass.up += 1;
                y
            }
            Stack::Down => {
                let y = H_DIACRITICS * pass.down;
                pass.down += 1;
                y
            }
            Stack::UpAndDown => {
                let y = -H_DIACRITICS * pass.up;
                pass.up += 1;
                pass.down += 1;
                y
            }
            Stack::BeforeAndAfter | Stack::DontStack => 0,
        };

        if base.is_low_height && AUTO_SHIFT_SHEETS.contains(&self.table.sheet_of(c)) {
            y += match prop.stack {
                Stack::Up | Stack::UpAndDown => LOW_HEIGHT_SHIFT_STACKED,
                Stack::DontStack => LOW_HEIGHT_SHIFT_OVERLAY,
                Stack::Down | Stack::BeforeAndAfter => 0,
            };
        }

        (x, y - prop.nudge_y)
    }
}

/// Advance of the syllable whose initial sits at `i`.
///
/// Some peaks reach one pixel past the block, but not when the next
/// syllable starts with a wide peak as well.
fn hangul_advance(cps: &[u32], i: usize) -> i32 {
    let peak = cps.get(i + 1).copied().and_then(hangul::jungseong_index);
    let widens = peak.is_some_and(hangul::peak_has_extra_width);
    let next_is_wide = cps.get(i + 2).is_some_and(|&c| hangul::is_choseong(c))
        && cps
            .get(i + 3)
            .copied()
            .and_then(hangul::jungseong_index)
            .is_some_and(hangul::is_wide_peak);
    if widens && !next_is_wide {
        W_HANGUL_SYLLABLE + 1
    } else {
        W_HANGUL_SYLLABLE
    }
}
