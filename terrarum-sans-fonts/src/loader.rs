//! Sprite-sheet loading from disk.
//!
//! Sheets are TGA (PNG is accepted too); a `.gz` file next to or instead of
//! the plain one is decompressed first. This is the only I/O the crate does
//! and it only runs while a font is being constructed.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use image::ImageFormat;

use crate::error::{FontError, Result};
use crate::pixels::SheetImage;
use crate::sheets::SheetSpec;

/// Decode one sheet file, transparently inflating `*.gz`.
pub fn load_sheet(path: &Path) -> Result<SheetImage> {
    let raw = fs::read(path).map_err(|source| FontError::SheetRead {
        path: path.to_path_buf(),
        source,
    })?;

    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    let (bytes, image_path) = if is_gzip {
        let mut inflated = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|source| FontError::SheetRead {
                path: path.to_path_buf(),
                source,
            })?;
        (inflated, path.with_extension(""))
    } else {
        (raw, path.to_path_buf())
    };

    // TGA has no magic number, so the format has to come from the name
    let format = ImageFormat::from_path(&image_path).unwrap_or(ImageFormat::Tga);
    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|source| {
        FontError::SheetDecode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Decoded sheet {:?} ({}x{})", path, width, height);

    // The buffer length always matches the reported dimensions
    Ok(SheetImage::from_rgba_bytes(width, height, rgba.as_raw())
        .unwrap_or_else(|| SheetImage::new(width, height)))
}

/// Path of a sheet inside `dir`, preferring the plain file over `.gz`.
pub fn find_sheet(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let plain = dir.join(file_name);
    if plain.is_file() {
        return Some(plain);
    }
    let gz = dir.join(format!("{file_name}.gz"));
    gz.is_file().then_some(gz)
}

/// Load every declared sheet that exists in `dir`.
///
/// Missing sheets are skipped with a warning so partial asset packs still
/// build a usable font; a sheet that exists but fails to decode is an error.
pub fn load_sheets(dir: &Path, sheets: &[SheetSpec]) -> Result<Vec<Option<SheetImage>>> {
    let mut images = Vec::with_capacity(sheets.len());
    let mut loaded = 0;

    for spec in sheets {
        match find_sheet(dir, spec.file_name) {
            Some(path) => {
                log::info!("Loading sheet {:?}", path);
                images.push(Some(load_sheet(&path)?));
                loaded += 1;
            }
            None => {
                log::warn!("Sheet {} not found in {:?}, skipping", spec.file_name, dir);
                images.push(None);
            }
        }
    }

    log::info!("Loaded {} of {} sheets from {:?}", loaded, sheets.len(), dir);
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelSource;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    fn png_bytes() -> Vec<u8> {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgba([0x10, 0x20, 0x30, 0xFF]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_load_plain_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        fs::write(&path, png_bytes()).unwrap();

        let sheet = load_sheet(&path).unwrap();
        assert_eq!((sheet.width(), sheet.height()), (2, 1));
        assert_eq!(sheet.pixel(1, 0), 0x1020_30FF);
        assert!(!sheet.is_set(0, 0));
    }

    #[test]
    fn test_load_gzipped_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&png_bytes()).unwrap();
        fs::write(&path, enc.finish().unwrap()).unwrap();

        let sheet = load_sheet(&path).unwrap();
        assert_eq!(sheet.pixel(1, 0), 0x1020_30FF);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sheet(&dir.path().join("nope.tga")).unwrap_err();
        assert!(matches!(err, FontError::SheetRead { .. }));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            load_sheet(&path).unwrap_err(),
            FontError::SheetDecode { .. }
        ));
    }

    #[test]
    fn test_find_sheet_prefers_plain_then_gz() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_sheet(dir.path(), "a.tga").is_none());
        fs::write(dir.path().join("a.tga.gz"), b"").unwrap();
        assert!(find_sheet(dir.path(), "a.tga").unwrap().ends_with("a.tga.gz"));
        fs::write(dir.path().join("a.tga"), b"").unwrap();
        assert!(find_sheet(dir.path(), "a.tga").unwrap().ends_with("a.tga"));
    }
}
