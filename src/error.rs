use thiserror::Error;

use crate::Size;

/// Errors raised by the face data model and the source code generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The face has no glyphs to generate source code for.
    #[error("Face contains no glyphs")]
    EmptyFace,

    /// Subset export was requested, but no glyph is marked as exported.
    #[error("No glyphs are selected for export")]
    NoExportedGlyphs,

    /// A glyph index outside `[0, count)` was accessed.
    #[error("Glyph index {index} out of range (face has {count} glyphs)")]
    GlyphIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of glyphs in the face.
        count: usize,
    },

    /// An exported glyph id does not name a glyph of the face.
    #[error("Exported glyph id {index} out of range (face has {count} glyphs)")]
    ExportedGlyphOutOfRange {
        /// Offending id.
        index: usize,
        /// Number of glyphs in the face.
        count: usize,
    },

    /// Glyph width or height is zero.
    #[error("Invalid glyph size {0}: width and height must be non-zero")]
    ZeroSize(Size),

    /// A pixel buffer does not hold `width * height` pixels.
    #[error("Pixel count mismatch: expected {expected}, got {actual}")]
    PixelCountMismatch {
        /// `width * height` of the glyph.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// A glyph's size differs from the face's glyph size.
    #[error("Glyph {index} has size {actual}, face glyph size is {expected}")]
    GlyphSizeMismatch {
        /// Index of the offending glyph.
        index: usize,
        /// Face glyph size.
        expected: Size,
        /// Size of the offending glyph.
        actual: Size,
    },

    /// A text-art row is shorter or longer than the first row.
    #[error("Text-art row {row} has {actual} pixels, expected {expected}")]
    RaggedArt {
        /// Zero-based row number.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// A text-art row contains a character that is neither ink nor paper.
    #[error("Invalid pixel character {0:?} in text art")]
    InvalidPixel(char),

    /// A background generation request panicked.
    #[error("Source code generation panicked: {0}")]
    GenerationPanicked(String),

    /// No registered output format has the given identifier.
    #[error("Unknown output format '{0}'")]
    UnknownFormat(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
