//! Terrarum Sans: a bitmap-font shaping and layout engine.
//!
//! The heavy lifting lives in the workspace crates:
//! - `terrarum-sans-fonts`: glyph metadata, normalisation, positioning and
//!   the shaping cache
//! - `terrarum-sans-config`: per-instance configuration
//!
//! This crate ties them into [`TerrarumSans`], the font object a host
//! holds, and adapts it to host interfaces through [`traits`].

/// Library version, for hosts that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod font;
pub mod traits;
mod traits_impl;

pub use font::{GLYPH_HEIGHT, LINE_HEIGHT, TerrarumSans};
pub use terrarum_sans_config::{CharsetOverride, ConfigError, FontConfig, MAX_SCALE};
pub use terrarum_sans_fonts::{
    CacheEntry, FontError, GlyphMetadataTable, GlyphRenderer, NormalizedSequence, PositionMap,
};
pub use traits::TextMeasure;
