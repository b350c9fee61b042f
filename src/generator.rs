use crate::error::{Error, Result};
use crate::idiom::{Idiom, IdiomSink, Value, ValueWidth};
use crate::lut::write_lut;
use crate::margins::{calculate_margins, pixel_margins};
use crate::packer::pack_trimmed;
use crate::{Face, Format, Glyph, Indentation, Margins, Size};

/// Order of pixels within a packed byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitNumbering {
    /// The first pixel of a run is the least significant bit.
    #[default]
    Lsb,
    /// The first pixel of a run is the most significant bit.
    Msb,
}

/// Which glyphs are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExportMethod {
    /// Only glyphs in [`Face::exported_glyph_ids`], plus an offset lookup table.
    #[default]
    ExportSelected,
    /// Every glyph, no lookup table.
    ExportAll,
}

/// Settings controlling the generated source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceCodeOptions {
    /// Column after which an array row is wrapped.
    pub wrap_column: usize,
    /// Which glyphs are emitted.
    pub export_method: ExportMethod,
    /// Order of pixels within a byte.
    pub bit_numbering: BitNumbering,
    /// Flip every bit right before a byte is emitted.
    pub invert_bits: bool,
    /// Keep rows that are blank across the whole face.
    pub include_line_spacing: bool,
    /// Leading whitespace of array rows.
    pub indentation: Indentation,
}

impl Default for SourceCodeOptions {
    fn default() -> Self {
        Self {
            wrap_column: 80,
            export_method: ExportMethod::default(),
            bit_numbering: BitNumbering::default(),
            invert_bits: false,
            include_line_spacing: false,
            indentation: Indentation::default(),
        }
    }
}

/// Converts a [`Face`] into source code.
///
/// ```
/// use glyph_source::{ExportMethod, Face, Format, Glyph, SourceCodeGenerator, SourceCodeOptions};
///
/// let glyph = Glyph::from_art(&["X.", ".X"]).unwrap();
/// let face = Face::new(glyph.size(), vec![glyph]).unwrap();
/// let options = SourceCodeOptions { export_method: ExportMethod::ExportAll, ..Default::default() };
///
/// let code = SourceCodeGenerator::new(options)
///     .with_timestamp("today")
///     .generate(&face, Format::C, "tiny")
///     .unwrap();
/// assert!(code.contains("const unsigned char tiny[] = {\n\t0x01,0x02, // Character 0x20 ( )\n};"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceCodeGenerator {
    options: SourceCodeOptions,
    timestamp: Option<String>,
    codepoint_offset: u32,
    glyph_codepoints: Option<Vec<u32>>,
}

impl SourceCodeGenerator {
    /// First printable ASCII character, the code point of glyph 0 by default.
    pub const PRINTABLE_ASCII_OFFSET: u32 = 0x20;

    /// Creates a generator stamping output with the current local time.
    #[must_use]
    pub fn new(options: SourceCodeOptions) -> Self {
        Self {
            options,
            timestamp: None,
            codepoint_offset: Self::PRINTABLE_ASCII_OFFSET,
            glyph_codepoints: None,
        }
    }

    /// Uses a fixed timestamp in the document header.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Sets the code point of glyph 0, used in per-glyph comments.
    #[must_use]
    pub fn with_codepoint_offset(mut self, offset: u32) -> Self {
        self.codepoint_offset = offset;
        self
    }

    /// Sets the code point of every glyph individually, e.g. the charset a face
    /// was rasterized from. Takes precedence over
    /// [`with_codepoint_offset`](Self::with_codepoint_offset) for glyphs it covers.
    #[must_use]
    pub fn with_glyph_codepoints(mut self, codepoints: Vec<u32>) -> Self {
        self.glyph_codepoints = Some(codepoints);
        self
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &SourceCodeOptions {
        &self.options
    }

    /// Generates source code for `face`, naming the data array `font_name`.
    ///
    /// # Errors
    /// [`Error::EmptyFace`] if the face has no glyphs and, for
    /// [`ExportMethod::ExportSelected`], [`Error::NoExportedGlyphs`] if nothing
    /// is selected. No text is produced in either case.
    pub fn generate(&self, face: &Face, format: Format, font_name: &str) -> Result<String> {
        if face.num_glyphs() == 0 {
            return Err(Error::EmptyFace);
        }

        match self.options.export_method {
            ExportMethod::ExportAll => Ok(self.generate_all(face, format, font_name)),
            ExportMethod::ExportSelected => {
                if face.exported_glyph_ids().is_empty() {
                    return Err(Error::NoExportedGlyphs);
                }
                self.generate_subset(face, format, font_name)
            }
        }
    }

    /// Comment identifying glyph `index`, e.g. `Character 0x41 (A)`.
    #[must_use]
    pub fn comment_for_glyph(&self, index: usize) -> String {
        match self.codepoint(index) {
            Some(codepoint) => match char::from_u32(codepoint).filter(|c| !c.is_control()) {
                Some(c) => format!("Character 0x{codepoint:02X} ({c})"),
                None => format!("Character 0x{codepoint:02X}"),
            },
            None => format!("Glyph {index}"),
        }
    }

    fn codepoint(&self, index: usize) -> Option<u32> {
        if let Some(&codepoint) = self.glyph_codepoints.as_ref().and_then(|codepoints| codepoints.get(index)) {
            return Some(codepoint);
        }
        u32::try_from(index)
            .ok()
            .and_then(|index| index.checked_add(self.codepoint_offset))
    }

    fn current_timestamp(&self) -> String {
        match &self.timestamp {
            Some(timestamp) => timestamp.clone(),
            None => chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Trimmed glyph size and the pixel margins to cut from each glyph.
    fn layout(&self, face: &Face) -> (Size, Margins) {
        if self.options.include_line_spacing {
            return (face.glyph_size(), Margins::default());
        }
        let line_margins = calculate_margins(face);
        log::debug!("line margins {line_margins:?} for {} glyphs", face.num_glyphs());
        (
            face.glyph_size().with_margins(line_margins),
            pixel_margins(line_margins, face.glyph_size()),
        )
    }

    fn begin(&self, sink: &mut IdiomSink, font_name: &str, size: Size) {
        let timestamp = self.current_timestamp();
        sink.emit(&Idiom::Begin { name: font_name, size, timestamp: &timestamp })
            .emit(&Idiom::BeginArray { name: font_name, width: ValueWidth::U8 });
    }

    fn output_glyph(&self, sink: &mut IdiomSink, glyph: &Glyph, margins: Margins, index: usize) {
        let indentation = self.options.indentation;
        let bytes = pack_trimmed(glyph, margins, &self.options);
        log::trace!("glyph {index}: {} bytes", bytes.len());

        sink.mark_row_start();
        sink.emit(&Idiom::BeginArrayRow { indentation });
        for byte in bytes {
            sink.emit(&Idiom::Value(Value::byte(byte)));
            if sink.column() >= self.options.wrap_column {
                sink.emit(&Idiom::LineBreak);
                sink.mark_row_start();
                sink.emit(&Idiom::BeginArrayRow { indentation });
            }
        }

        let comment = self.comment_for_glyph(index);
        sink.emit(&Idiom::Comment(&comment)).emit(&Idiom::LineBreak);
    }

    fn generate_all(&self, face: &Face, format: Format, font_name: &str) -> String {
        let (size, margins) = self.layout(face);
        let mut sink = IdiomSink::new(format);

        self.begin(&mut sink, font_name, size);
        for (index, glyph) in face.glyphs().iter().enumerate() {
            self.output_glyph(&mut sink, glyph, margins, index);
        }
        sink.emit(&Idiom::EndArray).emit(&Idiom::End);

        sink.finish()
    }

    fn generate_subset(&self, face: &Face, format: Format, font_name: &str) -> Result<String> {
        let (size, margins) = self.layout(face);
        let mut sink = IdiomSink::new(format);

        self.begin(&mut sink, font_name, size);
        for &index in face.exported_glyph_ids() {
            self.output_glyph(&mut sink, face.glyph_at(index)?, margins, index);
        }
        sink.emit(&Idiom::EndArray);

        write_lut(
            &mut sink,
            face.exported_glyph_ids(),
            size.bytes_per_glyph() as u64,
            self.options.indentation,
            |index| self.comment_for_glyph(index),
        );
        sink.emit(&Idiom::End);

        Ok(sink.finish())
    }
}

/// Generates source code for `face` with a fresh [`SourceCodeGenerator`].
///
/// # Errors
/// See [`SourceCodeGenerator::generate`].
pub fn generate(face: &Face, options: SourceCodeOptions, format: Format, font_name: &str) -> Result<String> {
    SourceCodeGenerator::new(options).generate(face, format, font_name)
}
