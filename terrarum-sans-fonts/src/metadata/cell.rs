//! Tag-column codec for variable-width cells.
//!
//! The last pixel column of every variable-width cell holds the glyph's
//! properties, one field per row (offsets relative to the cell top):
//!
//! | rows    | field |
//! |---------|-------|
//! | 0..=4   | width, bit `y` from row `y` |
//! | 5       | low-height flag |
//! | 6       | kerning: alpha = has data, bit 31 = Y-type, bits 8..32 = mask |
//! | 7..=8   | reserved |
//! | 9       | directive: opcode, arg1, arg2 in the R, G, B bytes |
//! | 10      | nudge X (R) and Y (G), signed |
//! | 11..=14 | diacritic anchors |
//! | 15..=16 | alignment |
//! | 17      | write-on-top, read without alpha masking |
//! | 18..=19 | stacking, `0x00FF00FF` in both rows = don't stack |
//!
//! Extra info lives in the leftmost columns of the cell, one 20-bit value
//! per column.

use crate::glyph_props::{
    ANCHOR_COUNT, Align, DiacriticAnchor, Directive, GlyphProperty, KERNING_MASK_NONE, Stack,
};
use crate::pixels::{PixelSource, SheetImage};

const WIDTH_BITS: u32 = 5;
const ROW_LOW_HEIGHT: u32 = 5;
const ROW_KERNING: u32 = 6;
const ROW_DIRECTIVE: u32 = 9;
const ROW_NUDGE: u32 = 10;
const ROW_ALIGN: u32 = 15;
const ROW_WRITE_ON_TOP: u32 = 17;
const ROW_STACK: u32 = 18;
const EXTRA_INFO_BITS: u32 = 20;

const DONT_STACK_PATTERN: u32 = 0x00FF_00FF;
const SET: u32 = 0x0000_00FF;

/// Anchor `i` keeps Y in this row and X in the one below.
fn anchor_row(i: usize) -> u32 {
    13 - (i as u32 / 3) * 2
}

/// Byte lane of anchor `i` within its row pixel.
fn anchor_shift(i: usize) -> u32 {
    (3 - (i as u32 % 3)) * 8
}

fn signed_byte(v: u32) -> i32 {
    (v & 0xFF) as u8 as i8 as i32
}

fn read_bits<P: PixelSource + ?Sized>(img: &P, x: u32, y: u32, count: u32) -> u32 {
    (0..count).fold(0, |acc, bit| {
        if img.is_set(x, y + bit) {
            acc | (1 << bit)
        } else {
            acc
        }
    })
}

fn write_bits(img: &mut SheetImage, x: u32, y: u32, count: u32, value: u32) {
    for bit in 0..count {
        let px = if value & (1 << bit) != 0 { SET } else { 0 };
        img.set_pixel(x, y + bit, px);
    }
}

/// Decode the properties of the cell whose top-left corner is
/// `(cell_x, cell_y)`.
pub fn decode_cell<P: PixelSource + ?Sized>(
    img: &P,
    cell_x: u32,
    cell_y: u32,
    cell_w: u32,
) -> GlyphProperty {
    let x = cell_x + cell_w - 1;
    let y = cell_y;

    let width = read_bits(img, x, y, WIDTH_BITS) as i32;
    let is_low_height = img.is_set(x, y + ROW_LOW_HEIGHT);

    let kern = img.tagified(x, y + ROW_KERNING);
    let has_kern_data = kern & 0xFF != 0;
    let (is_kern_y_type, kerning_mask) = if has_kern_data {
        (kern & 0x8000_0000 != 0, (kern >> 8) & 0xFF_FFFF)
    } else {
        (false, KERNING_MASK_NONE)
    };

    let dir = img.tagified(x, y + ROW_DIRECTIVE);
    let directive = Directive {
        opcode: (dir >> 24) as u8,
        arg1: (dir >> 16) as u8,
        arg2: (dir >> 8) as u8,
    };

    let nudge = img.tagified(x, y + ROW_NUDGE);
    let nudge_x = signed_byte(nudge >> 24);
    let nudge_y = signed_byte(nudge >> 16);

    let anchors = std::array::from_fn(|i| {
        let row = anchor_row(i);
        let shift = anchor_shift(i);
        let y_byte = (img.tagified(x, y + row) >> shift) & 0xFF;
        let x_byte = (img.tagified(x, y + row + 1) >> shift) & 0xFF;
        let y_used = y_byte & 0x80 != 0;
        let x_used = x_byte & 0x80 != 0;
        DiacriticAnchor {
            kind: i as u8,
            x: if x_used { (x_byte & 0x7F) as u8 } else { 0 },
            y: if y_used { (y_byte & 0x7F) as u8 } else { 0 },
            x_used,
            y_used,
        }
    });

    let align = Align::from_bits(read_bits(img, x, y + ROW_ALIGN, 2));

    let raw = img.pixel(x, y + ROW_WRITE_ON_TOP);
    let write_on_top = if raw & 0xFF == 0 {
        None
    } else if raw >> 8 == 0xFF_FFFF {
        Some(0)
    } else {
        Some(((raw >> 28) & 0xF) as u8)
    };

    let stack0 = img.tagified(x, y + ROW_STACK);
    let stack1 = img.tagified(x, y + ROW_STACK + 1);
    let stack = if stack0 == DONT_STACK_PATTERN && stack1 == DONT_STACK_PATTERN {
        Stack::DontStack
    } else {
        Stack::from_bits(read_bits(img, x, y + ROW_STACK, 2))
    };

    let mut prop = GlyphProperty {
        width,
        is_low_height,
        nudge_x,
        nudge_y,
        anchors,
        align,
        write_on_top,
        stack,
        extra_info: Vec::new(),
        has_kern_data,
        is_kern_y_type,
        kerning_mask,
        directive,
    };

    let count = prop.required_extra_info_count() as u32;
    prop.extra_info = (0..count)
        .map(|col| read_bits(img, cell_x + col, cell_y, EXTRA_INFO_BITS))
        .collect();
    prop
}

/// Write `prop` into the cell at `(cell_x, cell_y)`.
///
/// Only representable values survive: the width is clamped to 0..=31, the
/// nudges to a signed byte, anchor coordinates to 7 bits, write-on-top
/// types to 0..=15 and extra info to 20 bits. Bit 23 of the kerning mask
/// shares its pixel bit with the Y-type flag.
pub fn encode_cell(img: &mut SheetImage, cell_x: u32, cell_y: u32, cell_w: u32, prop: &GlyphProperty) {
    let x = cell_x + cell_w - 1;
    let y = cell_y;

    write_bits(img, x, y, WIDTH_BITS, prop.width.clamp(0, 31) as u32);
    img.set_pixel(x, y + ROW_LOW_HEIGHT, if prop.is_low_height { SET } else { 0 });

    let kern = if prop.has_kern_data {
        let y_flag = if prop.is_kern_y_type { 0x8000_0000 } else { 0 };
        y_flag | ((prop.kerning_mask & 0xFF_FFFF) << 8) | SET
    } else {
        0
    };
    img.set_pixel(x, y + ROW_KERNING, kern);

    let d = prop.directive;
    let dir = (u32::from(d.opcode) << 24) | (u32::from(d.arg1) << 16) | (u32::from(d.arg2) << 8);
    img.set_pixel(x, y + ROW_DIRECTIVE, if dir != 0 { dir | SET } else { 0 });

    let nx = prop.nudge_x.clamp(-128, 127) as i8 as u8;
    let ny = prop.nudge_y.clamp(-128, 127) as i8 as u8;
    let nudge = (u32::from(nx) << 24) | (u32::from(ny) << 16);
    img.set_pixel(x, y + ROW_NUDGE, if nudge != 0 { nudge | SET } else { 0 });

    let mut anchor_rows = [0u32; 4];
    for (i, a) in prop.anchors.iter().enumerate().take(ANCHOR_COUNT) {
        let base = (anchor_row(i) - 11) as usize;
        let shift = anchor_shift(i);
        if a.y_used {
            anchor_rows[base] |= (0x80 | u32::from(a.y & 0x7F)) << shift;
        }
        if a.x_used {
            anchor_rows[base + 1] |= (0x80 | u32::from(a.x & 0x7F)) << shift;
        }
    }
    for (offset, px) in anchor_rows.iter().enumerate() {
        let value = if *px != 0 { px | SET } else { 0 };
        img.set_pixel(x, y + 11 + offset as u32, value);
    }

    write_bits(img, x, y + ROW_ALIGN, 2, prop.align.bits());

    let wot = match prop.write_on_top {
        None => 0,
        Some(0) => 0xFFFF_FFFF,
        Some(t) => (u32::from(t.min(15)) << 28) | SET,
    };
    img.set_pixel(x, y + ROW_WRITE_ON_TOP, wot);

    match prop.stack.bits() {
        Some(bits) => write_bits(img, x, y + ROW_STACK, 2, bits),
        None => {
            img.set_pixel(x, y + ROW_STACK, DONT_STACK_PATTERN);
            img.set_pixel(x, y + ROW_STACK + 1, DONT_STACK_PATTERN);
        }
    }

    for (col, value) in prop.extra_info.iter().enumerate() {
        write_bits(img, cell_x + col as u32, cell_y, EXTRA_INFO_BITS, value & 0xF_FFFF);
    }
}
