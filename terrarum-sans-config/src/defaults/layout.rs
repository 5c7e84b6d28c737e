//! Default values for layout settings.

pub fn scale() -> u32 {
    1
}

pub fn interchar() -> i32 {
    0 // Extra pixels between base glyphs
}

pub fn kerning() -> bool {
    true
}

pub fn strict_metadata() -> bool {
    false // Missing glyphs fall back to the default property
}
