//! Passes driven by glyph metadata rather than by script tables.

use crate::error::{FontError, Result};
use crate::glyph_props::{Align, Stack};
use crate::metadata::GlyphMetadataTable;

use super::devanagari::is_i_matra_variant;

/// Every codepoint taken from extra info must itself have metadata.
fn check_known(table: &GlyphMetadataTable, c: u32, index: usize) -> Result<()> {
    if c == 0 || table.contains(c) {
        Ok(())
    } else {
        Err(FontError::CorruptSequenceState { codepoint: c, index })
    }
}

/// Replace each `BeforeAndAfter` glyph with `[before, glyph, after]`.
///
/// On error `out` holds everything produced before the failing glyph.
pub fn unpack_before_and_after(table: &GlyphMetadataTable, seq: &[u32], out: &mut Vec<u32>) -> Result<()> {
    for (index, &c) in seq.iter().enumerate() {
        let prop = table.get_or_default(c);
        if prop.stack == Stack::BeforeAndAfter
            && let [before, after] = prop.extra_info[..]
        {
            check_known(table, before, index)?;
            check_known(table, after, index)?;
            out.extend([before, c, after]);
        } else {
            out.push(c);
        }
    }
    Ok(())
}

/// Move each `Before`-aligned glyph in front of the glyph preceding it.
pub fn swap_before_aligned(table: &GlyphMetadataTable, seq: &mut [u32]) {
    for i in 1..seq.len() {
        let c = seq[i];
        if !is_i_matra_variant(c) && table.get_or_default(c).align == Align::Before {
            seq.swap(i - 1, i);
        }
    }
}

/// Expand replace-with glyphs into their replacement lists.
///
/// On error `out` holds everything produced before the failing glyph.
pub fn expand_replacements(table: &GlyphMetadataTable, seq: &[u32], out: &mut Vec<u32>) -> Result<()> {
    for (index, &c) in seq.iter().enumerate() {
        match table.get_or_default(c).replacement() {
            Some(replacement) => {
                for &r in &replacement {
                    check_known(table, r, index)?;
                }
                out.extend(replacement);
            }
            None => out.push(c),
        }
    }
    Ok(())
}
