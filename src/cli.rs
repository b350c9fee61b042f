use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use image::GrayImage;
use rusttype::Font;
use thiserror::Error;

use crate::{
    BitNumbering, Error, ExportMethod, Face, FaceReader, Format, Glyph, Indentation, Point, Size, SourceCodeGenerator,
    SourceCodeOptions,
};

/// Command line arguments of `font2src`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Font to convert: a TrueType/OpenType file, a RON/JSON face snapshot or a glyph sheet image
    #[arg(required_unless_present = "list_formats")]
    pub input: Option<PathBuf>,
    /// List of Unicode codepoint ranges written in hex, used when rasterizing TrueType fonts
    pub charset: Vec<String>,
    /// Path to where the generated source code should be written (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format identifier (see --list-formats)
    #[arg(short, long)]
    pub format: Option<Format>,
    /// Name of the generated data array
    #[arg(short, long, default_value = "font")]
    pub name: String,
    /// Glyph indices to export, e.g. `0-9,12`; enables the lookup table
    #[arg(short, long, value_delimiter = ',')]
    pub export: Vec<String>,
    /// Store the first pixel of a run in the most significant bit
    #[arg(long, overrides_with = "lsb")]
    pub msb: bool,
    /// Store the first pixel of a run in the least significant bit
    #[arg(long, overrides_with = "msb")]
    pub lsb: bool,
    /// Invert all bits
    #[arg(long, overrides_with = "no_invert")]
    pub invert: bool,
    /// Do not invert bits
    #[arg(long, overrides_with = "invert")]
    pub no_invert: bool,
    /// Keep rows that are blank in every glyph
    #[arg(long, overrides_with = "exclude_line_spacing")]
    pub include_line_spacing: bool,
    /// Trim rows that are blank in every glyph
    #[arg(long, overrides_with = "include_line_spacing")]
    pub exclude_line_spacing: bool,
    /// Column after which array rows are wrapped
    #[arg(long, default_value_t = 80)]
    pub wrap_column: usize,
    /// Indent array rows with this many spaces instead of a tab
    #[arg(long)]
    pub indent_spaces: Option<u8>,
    /// Code point of the first glyph, in hex, used for comments
    #[arg(long, value_parser = parse_hex)]
    pub codepoint_offset: Option<u32>,
    /// Desired font pixel height when rasterizing TrueType fonts
    #[arg(short, long, default_value_t = 16.0)]
    pub scale: f32,
    /// Coverage above which a rasterized pixel is set
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,
    /// Glyph cell size of a sheet image, e.g. `8x12`
    #[arg(long, value_parser = parse_cell)]
    pub cell: Option<Size>,
    /// Treat bright sheet pixels as ink
    #[arg(long)]
    pub light_ink: bool,
    /// RON file holding persisted source code settings
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Write the effective settings back to the settings file
    #[arg(long, requires = "settings")]
    pub save_settings: bool,
    /// Print the available output formats and exit
    #[arg(long)]
    pub list_formats: bool,
    /// Log more details (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter derived from `--verbose`.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Failures of the command line tool.
#[derive(Error, Debug)]
pub enum CliError {
    /// Face construction or generation failed.
    #[error(transparent)]
    Generate(#[from] Error),

    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    /// A glyph sheet could not be decoded.
    #[error("Failed to read glyph sheet: {0}")]
    Image(#[from] image::ImageError),

    /// A RON settings file or face snapshot could not be parsed.
    #[error("Failed to parse RON: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    RonWrite(#[from] ron::Error),

    /// A JSON face snapshot could not be parsed.
    #[error("Failed to parse JSON face: {0}")]
    Json(#[from] serde_json::Error),

    /// A font file could not be parsed.
    #[error("Failed to parse font data from {}", .0.display())]
    Font(PathBuf),

    /// A charset or export range is malformed.
    #[error("Invalid range specifier '{0}', expected [SINGLE] or [MIN_INCLUSIVE]-[MAX_INCLUSIVE]")]
    InvalidRange(String),

    /// A charset range names a value that is not a Unicode scalar.
    #[error("{0:x} is not a valid Unicode codepoint")]
    InvalidCodepoint(u32),

    /// A glyph sheet was given without `--cell`.
    #[error("Glyph sheets need a cell size (--cell WxH)")]
    MissingCellSize,
}

/// Source code settings persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    bit_numbering: BitNumbering,
    invert_bits: bool,
    include_line_spacing: bool,
    format: Format,
}

impl Settings {
    fn load(path: &Path) -> Result<Self, CliError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(ron::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(CliError::Io { path: path.into(), source }),
        }
    }

    fn save(&self, path: &Path) -> Result<(), CliError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text).map_err(|source| CliError::Io { path: path.into(), source })
    }

    /// Settings overridden by explicit command line flags.
    fn merged(self, args: &Args) -> Self {
        let bit_numbering = match switch(args.msb, args.lsb) {
            Some(true) => BitNumbering::Msb,
            Some(false) => BitNumbering::Lsb,
            None => self.bit_numbering,
        };
        Self {
            bit_numbering,
            invert_bits: switch(args.invert, args.no_invert).unwrap_or(self.invert_bits),
            include_line_spacing: switch(args.include_line_spacing, args.exclude_line_spacing)
                .unwrap_or(self.include_line_spacing),
            format: args.format.unwrap_or(self.format),
        }
    }
}

/// State of an `--x`/`--no-x` flag pair, `None` if neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Glyphs laid out left to right, top to bottom in equally sized cells of an image.
struct GlyphSheet {
    image: GrayImage,
    cell: Size,
    columns: usize,
    rows: usize,
    light_ink: bool,
}

impl GlyphSheet {
    fn new(image: GrayImage, cell: Size, light_ink: bool) -> Self {
        let columns = image.width() as usize / cell.width.max(1);
        let rows = image.height() as usize / cell.height.max(1);
        Self { image, cell, columns, rows, light_ink }
    }
}

impl FaceReader for GlyphSheet {
    fn font_size(&self) -> Size {
        self.cell
    }

    fn num_glyphs(&self) -> usize {
        self.columns * self.rows
    }

    fn is_pixel_set(&self, glyph_id: usize, p: Point) -> bool {
        let x = (glyph_id % self.columns) * self.cell.width + p.x;
        let y = (glyph_id / self.columns) * self.cell.height + p.y;
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return false;
        };
        let luma = self.image.get_pixel(x, y).0[0];
        (luma >= 0x80) == self.light_ink
    }
}

fn parse_hex(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|err| format!("{s}: {err}"))
}

fn parse_cell(s: &str) -> Result<Size, String> {
    let (width, height) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let width = width.parse().map_err(|_| format!("invalid cell width '{width}'"))?;
    let height = height.parse().map_err(|_| format!("invalid cell height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("cell size {s} must be non-zero"));
    }
    Ok(Size::new(width, height))
}

/// Parses `SINGLE` and `MIN-MAX` specifiers, optionally comma separated.
fn parse_ranges(specs: &[String], radix: u32) -> Result<BTreeSet<u32>, CliError> {
    let mut values = BTreeSet::new();

    for spec in specs.iter().flat_map(|s| s.split(',')).map(str::trim).filter(|s| !s.is_empty()) {
        let invalid = || CliError::InvalidRange(spec.to_owned());
        let parse = |s: &str| u32::from_str_radix(s, radix).map_err(|_| invalid());

        let mut piece_iter = spec.split('-');
        let fst = piece_iter.next();
        let snd = piece_iter.next();
        if piece_iter.next().is_some() {
            return Err(invalid());
        }

        match (fst, snd) {
            (Some(single), None) => {
                values.insert(parse(single)?);
            }
            (Some(min), Some(max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if min > max {
                    return Err(invalid());
                }
                values.extend(min..=max);
            }
            _ => return Err(invalid()),
        }
    }

    Ok(values)
}

fn parse_charset(specs: &[String]) -> Result<BTreeSet<char>, CliError> {
    let codepoints = parse_ranges(specs, 16)?;
    if codepoints.is_empty() {
        log::info!("no charset specified, defaulting to printable ASCII (20-7e)");
        return Ok((' '..='~').collect());
    }
    codepoints
        .into_iter()
        .map(|codepoint| char::from_u32(codepoint).ok_or(CliError::InvalidCodepoint(codepoint)))
        .collect()
}

/// Rasterizes `charset` into fixed cells: as tall as ascent minus descent,
/// as wide as the widest advance.
fn rasterize(font: &Font<'_>, charset: &BTreeSet<char>, scale: f32, threshold: f32) -> Result<Face, CliError> {
    let scale = rusttype::Scale::uniform(scale);
    let rusttype::VMetrics { ascent, descent, .. } = font.v_metrics(scale);

    let widest = charset
        .iter()
        .map(|&ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
        .fold(0.0f32, f32::max);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cell = Size::new(widest.ceil().max(1.0) as usize, (ascent - descent).ceil().max(1.0) as usize);
    log::info!("rasterizing {} glyphs into {cell} cells", charset.len());

    let glyphs = charset
        .iter()
        .map(|&ch| {
            let mut pixels = vec![false; cell.area()];
            let glyph = font.glyph(ch).scaled(scale).positioned(rusttype::point(0.0, ascent));
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| {
                    let (Ok(x), Ok(y)) = (
                        usize::try_from(i64::from(bounding_box.min.x) + i64::from(x)),
                        usize::try_from(i64::from(bounding_box.min.y) + i64::from(y)),
                    ) else {
                        return;
                    };
                    if x < cell.width && y < cell.height && v > threshold {
                        pixels[Point::new(x, y).offset(cell)] = true;
                    }
                });
            } else if !ch.is_whitespace() {
                log::warn!("no bounding box for non-whitespace glyph {:x}", ch as u32);
            }
            Glyph::from_pixels(cell, pixels)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Face::new(cell, glyphs)?)
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io { path: path.into(), source })
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase)
}

/// Loads the face named by `input`, picking the importer by file extension.
///
/// Rasterized fonts also yield the code point of every glyph.
fn load_face(args: &Args, input: &Path) -> Result<(Face, Option<Vec<u32>>), CliError> {
    match extension(input).as_deref() {
        Some("ttf" | "otf") => {
            let font = Font::try_from_vec(read(input)?).ok_or_else(|| CliError::Font(input.into()))?;
            let charset = parse_charset(&args.charset)?;
            let codepoints = charset.iter().map(|&ch| ch as u32).collect();
            Ok((rasterize(&font, &charset, args.scale, args.threshold)?, Some(codepoints)))
        }
        Some("ron") => Ok((ron::de::from_bytes(&read(input)?)?, None)),
        Some("json") => Ok((serde_json::from_slice(&read(input)?)?, None)),
        _ => {
            let cell = args.cell.ok_or(CliError::MissingCellSize)?;
            let sheet = GlyphSheet::new(image::open(input)?.to_luma8(), cell, args.light_ink);
            log::info!("reading {} glyphs of {cell} from sheet", sheet.num_glyphs());
            Ok((Face::from_reader(&sheet)?, None))
        }
    }
}

/// Generator labelling glyphs by `--codepoint-offset` if given, else by the
/// code points the face was rasterized from.
fn source_generator(args: &Args, options: SourceCodeOptions, codepoints: Option<Vec<u32>>) -> SourceCodeGenerator {
    let generator = SourceCodeGenerator::new(options);
    match (args.codepoint_offset, codepoints) {
        (Some(offset), _) => generator.with_codepoint_offset(offset),
        (None, Some(codepoints)) => generator.with_glyph_codepoints(codepoints),
        (None, None) => generator,
    }
}

/// Runs the command line tool.
///
/// # Errors
/// Any failure to read the input, parse settings, generate or write output.
pub fn run(args: &Args) -> Result<(), CliError> {
    if args.list_formats {
        let mut stdout = io::stdout().lock();
        for format in Format::ALL {
            writeln!(stdout, "{}\t{}", format.identifier(), format.display_name()).map_err(CliError::Output)?;
        }
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        return Ok(());
    };

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .merged(args);

    if args.save_settings {
        if let Some(path) = &args.settings {
            settings.save(path)?;
            log::info!("settings saved to {}", path.display());
        }
    }

    let (mut face, codepoints) = load_face(args, input)?;

    let exported = parse_ranges(&args.export, 10)?;
    if !exported.is_empty() {
        face = face.with_exported_glyph_ids(exported.into_iter().map(|id| id as usize))?;
    }
    let export_method = if face.exported_glyph_ids().is_empty() {
        ExportMethod::ExportAll
    } else {
        ExportMethod::ExportSelected
    };

    let options = SourceCodeOptions {
        wrap_column: args.wrap_column,
        export_method,
        bit_numbering: settings.bit_numbering,
        invert_bits: settings.invert_bits,
        include_line_spacing: settings.include_line_spacing,
        indentation: args.indent_spaces.map_or(Indentation::Tab, Indentation::Spaces),
    };

    log::info!(
        "generating {} for {} glyphs ({export_method:?})",
        settings.format.display_name(),
        face.num_glyphs()
    );
    let code = source_generator(args, options, codepoints).generate(&face, settings.format, &args.name)?;

    match &args.output {
        Some(path) => std::fs::write(path, &code).map_err(|source| CliError::Io { path: path.clone(), source })?,
        None => io::stdout().lock().write_all(code.as_bytes()).map_err(CliError::Output)?,
    }
    log::info!("wrote {} bytes of source code", code.len());

    Ok(())
}
