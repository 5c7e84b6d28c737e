//! Shared integration test helpers for terrarum-sans.
//!
//! ```ignore
//! mod common;
//! use common::{font, RecordingRenderer};
//! ```
//!
//! The `#[allow(dead_code)]` below keeps files that only use a subset of the
//! helpers warning-free.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use terrarum_sans::{FontConfig, GlyphMetadataTable, GlyphRenderer, NormalizedSequence, PositionMap, TerrarumSans};
use terrarum_sans_fonts::metadata::encode_cell;
use terrarum_sans_fonts::sheets::{self, SHEET_ASCII_VARW};
use terrarum_sans_fonts::{CodeRangeRegistry, GlyphProperty, PixelSource, SheetImage, Stack};

/// Shape masks the builtin kerning rules contract when A precedes V.
pub const MASK_A: u32 = 0x10;
pub const MASK_V: u32 = 0x02;

/// Printable ASCII at 6 px, kerned A and V at 8 px and a combining acute.
pub fn ascii_props() -> Vec<(u32, GlyphProperty)> {
    let mut props: Vec<(u32, GlyphProperty)> = (0x20..0x7F)
        .map(|c| (c, GlyphProperty::with_width(6)))
        .collect();

    for (c, mask) in [('A', MASK_A), ('V', MASK_V)] {
        let mut p = GlyphProperty::with_width(8);
        p.has_kern_data = true;
        p.kerning_mask = mask;
        props.push((c as u32, p));
    }

    let mut acute = GlyphProperty::with_width(0);
    acute.write_on_top = Some(0);
    acute.stack = Stack::Up;
    props.push((0x0301, acute));
    props
}

pub fn table() -> GlyphMetadataTable {
    GlyphMetadataTable::from_properties(CodeRangeRegistry::builtin().unwrap(), ascii_props())
}

/// What a [`RecordingRenderer`] has seen, shared with the test after the
/// renderer has moved into a font.
#[derive(Debug, Default)]
pub struct RenderLog {
    pub rendered: Vec<Vec<u32>>,
    pub released: Vec<u32>,
}

/// Hands out numbered artifacts and records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub log: Rc<RefCell<RenderLog>>,
    next_id: u32,
}

impl GlyphRenderer for RecordingRenderer {
    type Artifact = u32;

    fn render(&mut self, seq: &NormalizedSequence, _: &PositionMap) -> anyhow::Result<u32> {
        self.next_id += 1;
        self.log.borrow_mut().rendered.push(seq.codepoints().to_vec());
        Ok(self.next_id)
    }

    fn release(&mut self, artifact: u32) {
        self.log.borrow_mut().released.push(artifact);
    }
}

/// A font over [`table`] with the given config and a fresh recorder.
pub fn font(config: FontConfig) -> (TerrarumSans<RecordingRenderer>, Rc<RefCell<RenderLog>>) {
    let renderer = RecordingRenderer::default();
    let log = Rc::clone(&renderer.log);
    let font = TerrarumSans::new(table(), config, renderer).unwrap();
    (font, log)
}

/// Deterministic config for cache tests.
pub fn seeded_config() -> FontConfig {
    FontConfig {
        cache_seed: Some(0x5EED),
        ..FontConfig::default()
    }
}

/// Write `ascii_variable.tga` into `dir` with the tag columns of
/// [`ascii_props`].
pub fn write_ascii_sheet(dir: &Path) {
    let cell_w = sheets::cell_width(&sheets::SHEETS, SHEET_ASCII_VARW);
    let cell_h = sheets::cell_height(SHEET_ASCII_VARW);
    let cols = sheets::columns(SHEET_ASCII_VARW);

    let mut sheet = SheetImage::new(cell_w * cols, cell_h * 16);
    for (c, prop) in ascii_props().iter().filter(|(c, _)| *c < 0x100) {
        encode_cell(&mut sheet, (c % cols) * cell_w, (c / cols) * cell_h, cell_w, prop);
    }

    let img = image::RgbaImage::from_fn(sheet.width(), sheet.height(), |x, y| {
        image::Rgba(sheet.pixel(x, y).to_be_bytes())
    });
    img.save_with_format(dir.join("ascii_variable.tga"), image::ImageFormat::Tga)
        .unwrap();
}
