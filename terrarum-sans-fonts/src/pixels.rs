//! Read access to sprite-sheet pixels.
//!
//! Pixels are RGBA8888 packed as `R << 24 | G << 16 | B << 8 | A`, the
//! layout the tag-column encoding is defined in.

/// Anything the metadata decoder can read pixels from.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pixel at `(x, y)`; reads outside the image return 0.
    fn pixel(&self, x: u32, y: u32) -> u32;

    /// Whether the pixel's alpha byte is non-zero.
    fn is_set(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y) & 0xFF != 0
    }

    /// The raw pixel, or 0 when its alpha byte is zero.
    fn tagified(&self, x: u32, y: u32) -> u32 {
        let px = self.pixel(x, y);
        if px & 0xFF == 0 { 0 } else { px }
    }
}

/// An owned, in-memory RGBA8888 image.
#[derive(Clone, PartialEq, Eq)]
pub struct SheetImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl std::fmt::Debug for SheetImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl SheetImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Wrap packed pixels; `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == (width as usize) * (height as usize)).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from interleaved RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| u32::from_be_bytes([p[0], p[1], p[2], p[3]]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Write a pixel; writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y as usize) * (self.width as usize) + x as usize] = value;
        }
    }
}

impl PixelSource for SheetImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_zero() {
        let img = SheetImage::new(2, 2);
        assert_eq!(img.pixel(5, 0), 0);
        assert_eq!(img.pixel(0, 5), 0);
    }

    #[test]
    fn test_tagify_drops_transparent_pixels() {
        let mut img = SheetImage::new(2, 1);
        img.set_pixel(0, 0, 0xFFFF_FF00);
        img.set_pixel(1, 0, 0x1234_56FF);
        assert_eq!(img.tagified(0, 0), 0);
        assert!(!img.is_set(0, 0));
        assert_eq!(img.tagified(1, 0), 0x1234_56FF);
        assert!(img.is_set(1, 0));
    }

    #[test]
    fn test_from_rgba_bytes_packs_big_endian() {
        let img = SheetImage::from_rgba_bytes(1, 1, &[0x11, 0x22, 0x33, 0x44]).unwrap();
        assert_eq!(img.pixel(0, 0), 0x1122_3344);
        assert!(SheetImage::from_rgba_bytes(2, 1, &[0; 4]).is_none());
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let img = SheetImage::from_pixels(2, 1, vec![0, 0xFF00_00FF]).unwrap();
        assert!(!img.is_set(0, 0));
        assert_eq!(img.pixel(1, 0), 0xFF00_00FF);
        assert!(SheetImage::from_pixels(2, 2, vec![0; 3]).is_none());
    }
}
