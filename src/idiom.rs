//! Structural events emitted while walking a face, independent of output syntax.
//!
//! The generator never writes text itself. It emits [`Idiom`]s into an
//! [`IdiomSink`], which asks the selected [`Format`] to render each one.

use std::fmt;

use crate::{Format, Size};

/// Element type of a generated array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueWidth {
    /// 8-bit unsigned.
    U8,
    /// 16-bit unsigned.
    U16,
    /// 32-bit unsigned.
    U32,
    /// 64-bit unsigned.
    U64,
}

impl ValueWidth {
    /// Number of bytes in one element.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

/// One array element together with its declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    /// Element type of the enclosing array.
    pub width: ValueWidth,
    /// The element. Always fits in `width`.
    pub value: u64,
}

impl Value {
    /// A packed glyph byte.
    #[must_use]
    pub const fn byte(byte: u8) -> Self {
        Self { width: ValueWidth::U8, value: byte as u64 }
    }

    /// A value of the given width.
    #[must_use]
    pub const fn new(width: ValueWidth, value: u64) -> Self {
        Self { width, value }
    }
}

/// Whitespace written at the start of every array row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Indentation {
    /// A single tab character.
    #[default]
    Tab,
    /// The given number of spaces.
    Spaces(u8),
}

impl fmt::Display for Indentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Tab => f.write_str("\t"),
            Self::Spaces(n) => write!(f, "{:1$}", "", usize::from(n)),
        }
    }
}

/// A structural event of a generated source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idiom<'a> {
    /// Document preamble.
    Begin {
        /// Font (array) name.
        name: &'a str,
        /// Glyph size after trimming.
        size: Size,
        /// Generation time.
        timestamp: &'a str,
    },
    /// Opens a named array.
    BeginArray {
        /// Array identifier.
        name: &'a str,
        /// Element type.
        width: ValueWidth,
    },
    /// Starts a new indented line within an array.
    BeginArrayRow {
        /// Leading whitespace.
        indentation: Indentation,
    },
    /// One array element.
    Value(Value),
    /// Trailing annotation of a row.
    Comment(&'a str),
    /// Ends the current row.
    LineBreak,
    /// Closes the current array.
    EndArray,
    /// Document footer.
    End,
}

/// Text buffer that renders idioms and tracks the column of the current array row.
#[derive(Debug, Clone)]
pub struct IdiomSink {
    format: Format,
    out: String,
    row_start: usize,
}

impl IdiomSink {
    /// Creates an empty sink rendering in `format`.
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            out: String::new(),
            row_start: 0,
        }
    }

    /// Format idioms are rendered in.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Appends the rendering of `idiom`.
    pub fn emit(&mut self, idiom: &Idiom<'_>) -> &mut Self {
        self.out.push_str(&self.format.render(idiom));
        self
    }

    /// Records the current position as the start of an array row.
    pub fn mark_row_start(&mut self) {
        self.row_start = self.out.len();
    }

    /// Bytes written since the last [`mark_row_start`](Self::mark_row_start).
    #[must_use]
    pub fn column(&self) -> usize {
        self.out.len() - self.row_start
    }

    /// Text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the sink, returning the generated text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}
