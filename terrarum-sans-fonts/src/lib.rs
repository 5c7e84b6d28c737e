//! Glyph metadata, normalisation, layout and caching for the Terrarum Sans
//! bitmap font.
//!
//! This crate provides:
//! - Decoding of per-glyph metadata from the tag column of sprite-sheet cells
//! - The codepoint → sheet registry for every script the font covers
//! - Shape-based kerning with mirrored rules
//! - A normaliser that rewrites text into the font's internal codepoints
//!   (Hangul jamo, Devanagari conjuncts, Tamil and Sundanese ligatures)
//! - Per-glyph positioning including diacritic stacking
//! - A bounded shaping cache over a pluggable renderer
//!
//! # Architecture
//!
//! Text flows through a fixed pipeline:
//! 1. `Normalizer` turns a string into a `NormalizedSequence` bracketed by
//!    sentinels
//! 2. `PositionBuilder` turns that sequence into a `PositionMap`, consulting
//!    the `GlyphMetadataTable` and the `KerningEngine`
//! 3. `ShapingCache` memoises the result together with whatever a
//!    `GlyphRenderer` drew for it
//!
//! The metadata table is read-only once built and may be shared between
//! threads; the cache belongs to a single font instance.

pub mod codepoints;
pub mod error;
pub mod glyph_props;
pub mod hangul;
pub mod kerning;
pub mod layout;
pub mod loader;
pub mod metadata;
pub mod normalizer;
pub mod pixels;
pub mod shaping_cache;
pub mod sheets;

// Re-export main types for convenience
pub use error::{FontError, Result};
pub use glyph_props::{Align, DiacriticAnchor, Directive, GlyphProperty, Stack};
pub use kerning::{KerningEngine, KerningRule};
pub use layout::{PositionBuilder, PositionMap};
pub use metadata::GlyphMetadataTable;
pub use normalizer::{NormalizedSequence, Normalizer};
pub use pixels::{PixelSource, SheetImage};
pub use shaping_cache::{CacheEntry, CacheState, GlyphRenderer, ShapingCache, content_hash};
pub use sheets::{CodeRangeRegistry, SHEETS, SheetId, SheetSpec};
