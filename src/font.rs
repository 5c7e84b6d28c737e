//! The font object.
//!
//! [`TerrarumSans`] owns everything one font instance needs: the decoded
//! glyph metadata, the kerning rules, its own [`FontConfig`], a rendering
//! collaborator and the shaping cache that remembers what that collaborator
//! drew. Nothing is shared between instances.

use std::path::Path;

use anyhow::{Context, Result};
use terrarum_sans_config::FontConfig;
use terrarum_sans_fonts::loader;
use terrarum_sans_fonts::{
    CacheEntry, CodeRangeRegistry, GlyphMetadataTable, GlyphRenderer, KerningEngine,
    NormalizedSequence, Normalizer, PositionBuilder, PositionMap, ShapingCache,
};

/// Distance between baselines of consecutive lines, unscaled.
pub const LINE_HEIGHT: i32 = terrarum_sans_fonts::sheets::LINE_HEIGHT as i32;

/// Height of a glyph cell, unscaled.
pub const GLYPH_HEIGHT: i32 = terrarum_sans_fonts::sheets::H as i32;

pub struct TerrarumSans<R: GlyphRenderer> {
    table: GlyphMetadataTable,
    kerning: KerningEngine,
    config: FontConfig,
    renderer: R,
    cache: ShapingCache<R::Artifact>,
}

impl<R: GlyphRenderer> std::fmt::Debug for TerrarumSans<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrarumSans")
            .field("glyphs", &self.table.len())
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

impl<R: GlyphRenderer> TerrarumSans<R> {
    /// Build a font over an already decoded metadata table.
    pub fn new(table: GlyphMetadataTable, config: FontConfig, renderer: R) -> Result<Self> {
        config.validate().context("Invalid font configuration")?;

        let cache = ShapingCache::new(config.cache_capacity, config.cache_seed, config.first_use_rebuild);
        log::info!(
            "Font ready: {} glyphs, scale {}, cache capacity {}",
            table.len(),
            config.scale,
            config.cache_capacity
        );

        Ok(Self {
            table,
            kerning: KerningEngine::builtin(),
            config,
            renderer,
            cache,
        })
    }

    /// Build a font from the sprite sheets in `config.asset_dir`.
    ///
    /// Sheets missing from the directory are skipped; a sheet that is present
    /// but unreadable fails construction.
    pub fn from_asset_dir(config: FontConfig, renderer: R) -> Result<Self> {
        let dir = config
            .asset_dir
            .clone()
            .context("No asset directory configured")?;
        let table = load_table(&dir)?;
        Self::new(table, config, renderer)
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn table(&self) -> &GlyphMetadataTable {
        &self.table
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Number of shaped runs currently cached.
    pub fn cached_runs(&self) -> usize {
        self.cache.len()
    }

    pub fn line_height(&self) -> i32 {
        LINE_HEIGHT.saturating_mul(self.scale())
    }

    pub fn glyph_height(&self) -> i32 {
        GLYPH_HEIGHT.saturating_mul(self.scale())
    }

    /// The configured scale; construction has already bounded it.
    pub fn scale(&self) -> i32 {
        i32::try_from(self.config.scale).unwrap_or(i32::MAX)
    }

    fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(&self.table)
            .with_charset(self.config.charset)
            .with_strict(self.config.strict_metadata)
    }

    /// Normalise `text` with this font's charset and strictness.
    pub fn normalize(&self, text: &str) -> terrarum_sans_fonts::Result<NormalizedSequence> {
        self.normalizer().normalize(text)
    }

    /// Scaled glyph positions for `text`.
    pub fn layout(&self, text: &str) -> terrarum_sans_fonts::Result<PositionMap> {
        let seq = self.normalize(text)?;
        let positions = position_builder(&self.table, &self.kerning, &self.config).build(&seq)?;
        Ok(positions.scaled(self.scale()))
    }

    /// Scaled advance of `text`, the last entry of [`Self::layout`].
    pub fn measure(&self, text: &str) -> terrarum_sans_fonts::Result<i32> {
        Ok(self.layout(text)?.total_width())
    }

    /// Shape `text`, have the renderer draw it if it is not cached yet, and
    /// return the cache entry.
    ///
    /// Positions in the entry are unscaled; the renderer applies the scale.
    pub fn shape_and_cache(&mut self, text: &str) -> Result<&CacheEntry<R::Artifact>> {
        let seq = self
            .normalize(text)
            .with_context(|| format!("Failed to normalise {text:?}"))?;
        if seq.is_truncated() {
            log::warn!("Shaping of {:?} was cut short", text);
        }

        let builder = position_builder(&self.table, &self.kerning, &self.config);
        self.cache
            .get_or_build(seq, |s| builder.build(s), &mut self.renderer)
    }

    /// Release every cached artifact and drop the font.
    pub fn dispose(mut self) {
        self.release_cache();
    }

    fn release_cache(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("Releasing {} cached runs", self.cache.len());
        }
        self.cache.clear(&mut self.renderer);
    }
}

impl<R: GlyphRenderer> Drop for TerrarumSans<R> {
    fn drop(&mut self) {
        self.release_cache();
    }
}

fn position_builder<'a>(
    table: &'a GlyphMetadataTable,
    kerning: &'a KerningEngine,
    config: &FontConfig,
) -> PositionBuilder<'a> {
    PositionBuilder::new(table, kerning)
        .with_kerning(config.kerning)
        .with_interchar(config.interchar)
        .with_strict(config.strict_metadata)
}

fn load_table(dir: &Path) -> Result<GlyphMetadataTable> {
    let registry = CodeRangeRegistry::builtin().context("Built-in sheet table is inconsistent")?;
    let images = loader::load_sheets(dir, registry.sheets())
        .with_context(|| format!("Failed to load font sheets from {}", dir.display()))?;
    Ok(GlyphMetadataTable::from_sheets(registry, &images))
}
