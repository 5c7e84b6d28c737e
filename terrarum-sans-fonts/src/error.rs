//! Typed error types for terrarum-sans-fonts.
//!
//! Construction-time failures (bad assets, inconsistent sheet declarations)
//! and per-call failures (strict-mode lookups) are kept apart so callers can
//! decide which ones are fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the shaping core.
#[derive(Debug, Error)]
pub enum FontError {
    // -----------------------------------------------------------------------
    // Per-call errors
    // -----------------------------------------------------------------------
    /// A codepoint has no decoded glyph property and strict lookups are on.
    #[error("no glyph metadata for U+{codepoint:04X}")]
    MissingGlyphMetadata {
        /// The codepoint that was looked up.
        codepoint: u32,
    },

    /// A shaping pass met a codepoint it could not resolve midway.
    ///
    /// Never escapes a public shaping call: the pass that raises it
    /// truncates its output instead.
    #[error("shaping pass aborted at index {index} on U+{codepoint:04X}")]
    CorruptSequenceState {
        /// The codepoint without a property.
        codepoint: u32,
        /// Its position in the sequence being processed.
        index: usize,
    },

    // -----------------------------------------------------------------------
    // Construction-time errors
    // -----------------------------------------------------------------------
    /// A sheet's file name and its registration disagree about whether it
    /// is variable-width.
    #[error("sheet '{file_name}' is declared inconsistently: {reason}")]
    MalformedAssetDeclaration {
        /// File name of the offending sheet.
        file_name: String,
        /// What disagreed.
        reason: String,
    },

    /// A sheet file could not be read from disk.
    #[error("failed to read sheet '{path}': {source}")]
    SheetRead {
        /// Path of the sheet file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A sheet file was read but could not be decoded as an image.
    #[error("failed to decode sheet '{path}': {source}")]
    SheetDecode {
        /// Path of the sheet file.
        path: PathBuf,
        /// Underlying image decoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FontError>;
