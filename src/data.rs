use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

const INK: &[char] = &['X', '#', '*', '1', '@'];
const PAPER: &[char] = &['.', ' ', '-', '0'];

/// Pixel dimensions of a glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Size {
    /// Creates a size from its dimensions.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size left after removing the top and bottom line margins.
    ///
    /// Left and right margins are not applied: packing only ever drops whole rows.
    #[must_use]
    pub fn with_margins(self, line_margins: Margins) -> Self {
        Self {
            width: self.width,
            height: self.height.saturating_sub(line_margins.top + line_margins.bottom),
        }
    }

    /// Number of packed bytes needed for one pixel row.
    #[must_use]
    pub fn bytes_per_row(self) -> usize {
        self.width.div_ceil(8)
    }

    /// Number of packed bytes needed for one glyph of this size.
    #[must_use]
    pub fn bytes_per_glyph(self) -> usize {
        self.height * self.bytes_per_row()
    }

    /// Total number of pixels.
    #[must_use]
    pub fn area(self) -> usize {
        self.width * self.height
    }

    fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A pixel coordinate within a glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Column, counted from the left.
    pub x: usize,
    /// Row, counted from the top.
    pub y: usize,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Index of this point in a row-major pixel buffer of the given size.
    #[must_use]
    pub const fn offset(self, size: Size) -> usize {
        self.y * size.width + self.x
    }
}

/// Margins around a glyph, expressed either in lines or in flattened pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    /// Top margin.
    pub top: usize,
    /// Bottom margin.
    pub bottom: usize,
    /// Left margin.
    pub left: usize,
    /// Right margin.
    pub right: usize,
}

impl Margins {
    /// Margins with only the vertical components set.
    #[must_use]
    pub const fn vertical(top: usize, bottom: usize) -> Self {
        Self { top, bottom, left: 0, right: 0 }
    }

    /// `true` if every component is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }
}

/// A fixed-size, row-major monochrome bitmap for one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize), serde(into = "GlyphArt"))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize), serde(try_from = "GlyphArt"))]
pub struct Glyph {
    size: Size,
    pixels: Vec<bool>,
}

impl Glyph {
    /// Creates a blank glyph.
    ///
    /// # Errors
    /// [`Error::ZeroSize`] if either dimension is zero.
    pub fn new(size: Size) -> Result<Self> {
        Self::from_pixels(size, vec![false; size.area()])
    }

    /// Creates a glyph from a row-major pixel buffer.
    ///
    /// # Errors
    /// [`Error::ZeroSize`] if either dimension is zero and
    /// [`Error::PixelCountMismatch`] if `pixels` does not hold exactly
    /// `width * height` entries.
    pub fn from_pixels(size: Size, pixels: Vec<bool>) -> Result<Self> {
        if size.is_empty() {
            return Err(Error::ZeroSize(size));
        }
        if pixels.len() != size.area() {
            return Err(Error::PixelCountMismatch {
                expected: size.area(),
                actual: pixels.len(),
            });
        }
        Ok(Self { size, pixels })
    }

    /// Parses text art, one string per pixel row.
    ///
    /// `X`, `#`, `*`, `1` and `@` mark set pixels; `.`, space, `-` and `0`
    /// mark clear ones.
    ///
    /// ```
    /// # use glyph_source::Glyph;
    /// let glyph = Glyph::from_art(&[".X.", "X.X"]).unwrap();
    /// assert_eq!(glyph.size().width, 3);
    /// assert_eq!(glyph.to_art(), vec![".X.", "X.X"]);
    /// ```
    ///
    /// # Errors
    /// [`Error::RaggedArt`] for rows of differing length,
    /// [`Error::InvalidPixel`] for unknown characters and [`Error::ZeroSize`]
    /// for empty art.
    pub fn from_art<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut pixels = Vec::with_capacity(width * rows.len());

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(Error::RaggedArt {
                    row: row_index,
                    expected: width,
                    actual: row_width,
                });
            }
            for ch in row.chars() {
                if INK.contains(&ch) {
                    pixels.push(true);
                } else if PAPER.contains(&ch) {
                    pixels.push(false);
                } else {
                    return Err(Error::InvalidPixel(ch));
                }
            }
        }

        Self::from_pixels(Size::new(width, rows.len()), pixels)
    }

    /// Renders the glyph as text art using `X` and `.`.
    #[must_use]
    pub fn to_art(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|&set| if set { 'X' } else { '.' }).collect())
            .collect()
    }

    /// Glyph dimensions.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Row-major pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Whether the pixel at `p` is set. Points outside the glyph are clear.
    #[must_use]
    pub fn is_pixel_set(&self, p: Point) -> bool {
        p.x < self.size.width && p.y < self.size.height && self.pixels[p.offset(self.size)]
    }

    /// Iterates over pixel rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[bool]> + ExactSizeIterator {
        self.pixels.chunks_exact(self.size.width)
    }

    /// `true` if no pixel is set.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Number of blank rows above the first set pixel.
    #[must_use]
    pub fn leading_blank_rows(&self) -> usize {
        self.rows().take_while(|row| !row.contains(&true)).count()
    }

    /// Number of blank rows below the last set pixel.
    #[must_use]
    pub fn trailing_blank_rows(&self) -> usize {
        self.rows().rev().take_while(|row| !row.contains(&true)).count()
    }

    fn without_rows(&self, top: usize, bottom: usize) -> Result<Self> {
        let size = self.size.with_margins(Margins::vertical(top, bottom));
        let pixels = self
            .rows()
            .skip(top)
            .take(size.height)
            .flatten()
            .copied()
            .collect();
        Self::from_pixels(size, pixels)
    }
}

/// Source of glyph pixels, implemented by font importers.
pub trait FaceReader {
    /// Size shared by every glyph.
    fn font_size(&self) -> Size;
    /// Number of glyphs available.
    fn num_glyphs(&self) -> usize;
    /// Whether pixel `p` of glyph `glyph_id` is set.
    fn is_pixel_set(&self, glyph_id: usize, p: Point) -> bool;
}

/// An ordered set of equally sized glyphs, plus the subset selected for export.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize), serde(into = "FaceRepr"))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize), serde(try_from = "FaceRepr"))]
pub struct Face {
    glyph_size: Size,
    glyphs: Vec<Glyph>,
    exported_glyph_ids: BTreeSet<usize>,
}

impl Face {
    /// Creates a face with no exported glyphs.
    ///
    /// # Errors
    /// [`Error::ZeroSize`] for an empty glyph size and
    /// [`Error::GlyphSizeMismatch`] if any glyph differs from `glyph_size`.
    pub fn new(glyph_size: Size, glyphs: Vec<Glyph>) -> Result<Self> {
        if glyph_size.is_empty() {
            return Err(Error::ZeroSize(glyph_size));
        }
        if let Some((index, glyph)) = glyphs.iter().enumerate().find(|(_, g)| g.size() != glyph_size) {
            return Err(Error::GlyphSizeMismatch {
                index,
                expected: glyph_size,
                actual: glyph.size(),
            });
        }
        Ok(Self {
            glyph_size,
            glyphs,
            exported_glyph_ids: BTreeSet::new(),
        })
    }

    /// Reads every glyph from `reader`.
    ///
    /// # Errors
    /// [`Error::ZeroSize`] if the reader reports an empty font size.
    pub fn from_reader<R: FaceReader + ?Sized>(reader: &R) -> Result<Self> {
        let size = reader.font_size();
        let glyphs = (0..reader.num_glyphs())
            .map(|id| {
                let pixels = (0..size.height)
                    .flat_map(|y| (0..size.width).map(move |x| Point::new(x, y)))
                    .map(|p| reader.is_pixel_set(id, p))
                    .collect();
                Glyph::from_pixels(size, pixels)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(size, glyphs)
    }

    /// Replaces the exported glyph selection.
    ///
    /// # Errors
    /// [`Error::ExportedGlyphOutOfRange`] if an id does not name a glyph.
    pub fn with_exported_glyph_ids<I>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let ids: BTreeSet<usize> = ids.into_iter().collect();
        if let Some(&index) = ids.range(self.glyphs.len()..).next() {
            return Err(Error::ExportedGlyphOutOfRange {
                index,
                count: self.glyphs.len(),
            });
        }
        self.exported_glyph_ids = ids;
        Ok(self)
    }

    /// Marks every glyph as exported.
    #[must_use]
    pub fn export_all(mut self) -> Self {
        self.exported_glyph_ids = (0..self.glyphs.len()).collect();
        self
    }

    /// Size shared by every glyph.
    #[must_use]
    pub fn glyph_size(&self) -> Size {
        self.glyph_size
    }

    /// Number of glyphs.
    #[must_use]
    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// All glyphs in order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyph at `index`.
    ///
    /// # Errors
    /// [`Error::GlyphIndexOutOfRange`] outside `[0, num_glyphs)`.
    pub fn glyph_at(&self, index: usize) -> Result<&Glyph> {
        self.glyphs.get(index).ok_or(Error::GlyphIndexOutOfRange {
            index,
            count: self.glyphs.len(),
        })
    }

    /// Ids of glyphs selected for subset export, ascending.
    #[must_use]
    pub fn exported_glyph_ids(&self) -> &BTreeSet<usize> {
        &self.exported_glyph_ids
    }

    /// Whether glyph `index` is selected for subset export.
    #[must_use]
    pub fn is_exported(&self, index: usize) -> bool {
        self.exported_glyph_ids.contains(&index)
    }

    /// Copy of this face with `line_margins.top` and `line_margins.bottom`
    /// rows removed from every glyph.
    ///
    /// # Errors
    /// [`Error::ZeroSize`] if the margins consume the whole glyph height.
    pub fn trimmed(&self, line_margins: Margins) -> Result<Self> {
        let glyphs = self
            .glyphs
            .iter()
            .map(|g| g.without_rows(line_margins.top, line_margins.bottom))
            .collect::<Result<Vec<_>>>()?;
        let mut face = Self::new(self.glyph_size.with_margins(line_margins), glyphs)?;
        face.exported_glyph_ids.clone_from(&self.exported_glyph_ids);
        Ok(face)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
struct GlyphArt(Vec<String>);

#[cfg(feature = "serde-serialize")]
impl From<Glyph> for GlyphArt {
    fn from(glyph: Glyph) -> Self {
        Self(glyph.to_art())
    }
}

#[cfg(feature = "serde-deserialize")]
impl TryFrom<GlyphArt> for Glyph {
    type Error = Error;

    fn try_from(art: GlyphArt) -> Result<Self> {
        Glyph::from_art(&art.0)
    }
}

#[cfg(any(feature = "serde-serialize", feature = "serde-deserialize"))]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize))]
struct FaceRepr {
    #[serde(default)]
    glyph_size: Option<Size>,
    glyphs: Vec<Glyph>,
    #[serde(default)]
    exported: BTreeSet<usize>,
}

#[cfg(feature = "serde-serialize")]
impl From<Face> for FaceRepr {
    fn from(face: Face) -> Self {
        Self {
            glyph_size: Some(face.glyph_size),
            glyphs: face.glyphs,
            exported: face.exported_glyph_ids,
        }
    }
}

#[cfg(feature = "serde-deserialize")]
impl TryFrom<FaceRepr> for Face {
    type Error = Error;

    fn try_from(repr: FaceRepr) -> Result<Self> {
        let size = repr
            .glyph_size
            .or_else(|| repr.glyphs.first().map(Glyph::size))
            .unwrap_or_default();
        Face::new(size, repr.glyphs)?.with_exported_glyph_ids(repr.exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Checkerboard;

    impl FaceReader for Checkerboard {
        fn font_size(&self) -> Size {
            Size::new(3, 2)
        }

        fn num_glyphs(&self) -> usize {
            2
        }

        fn is_pixel_set(&self, glyph_id: usize, p: Point) -> bool {
            (p.x + p.y + glyph_id) % 2 == 0
        }
    }

    #[test]
    fn test_point_offset() {
        let size = Size::new(17, 4);
        assert_eq!(Point::new(0, 0).offset(size), 0);
        assert_eq!(Point::new(3, 2).offset(size), 37);
    }

    #[test]
    fn test_bytes_per_glyph() {
        assert_eq!(Size::new(5, 1).bytes_per_row(), 1);
        assert_eq!(Size::new(8, 1).bytes_per_row(), 1);
        assert_eq!(Size::new(12, 1).bytes_per_row(), 2);
        assert_eq!(Size::new(17, 15).bytes_per_glyph(), 45);
    }

    #[test]
    fn test_glyph_validation() {
        assert_eq!(Glyph::new(Size::new(0, 4)), Err(Error::ZeroSize(Size::new(0, 4))));
        assert_eq!(
            Glyph::from_pixels(Size::new(2, 2), vec![true; 3]),
            Err(Error::PixelCountMismatch { expected: 4, actual: 3 })
        );
        assert_eq!(
            Glyph::from_art(&["XX", "X"]),
            Err(Error::RaggedArt { row: 1, expected: 2, actual: 1 })
        );
        assert_eq!(Glyph::from_art(&["X?"]), Err(Error::InvalidPixel('?')));
    }

    #[test]
    fn test_glyph_blank_rows() {
        let glyph = Glyph::from_art(&["...", ".X.", "...", "..."]).unwrap();
        assert_eq!(glyph.leading_blank_rows(), 1);
        assert_eq!(glyph.trailing_blank_rows(), 2);
        assert!(glyph.is_pixel_set(Point::new(1, 1)));
        assert!(!glyph.is_pixel_set(Point::new(7, 1)));
        assert!(!glyph.is_blank());
        assert!(Glyph::new(Size::new(3, 3)).unwrap().is_blank());
    }

    #[test]
    fn test_face_from_reader() {
        let face = Face::from_reader(&Checkerboard).unwrap();
        assert_eq!(face.num_glyphs(), 2);
        assert_eq!(face.glyph_at(0).unwrap().to_art(), vec!["X.X", ".X."]);
        assert_eq!(face.glyph_at(1).unwrap().to_art(), vec![".X.", "X.X"]);
        assert_eq!(face.glyph_at(2), Err(Error::GlyphIndexOutOfRange { index: 2, count: 2 }));
    }

    #[test]
    fn test_face_rejects_mismatched_glyphs() {
        let glyphs = vec![Glyph::new(Size::new(2, 2)).unwrap(), Glyph::new(Size::new(2, 3)).unwrap()];
        assert_eq!(
            Face::new(Size::new(2, 2), glyphs),
            Err(Error::GlyphSizeMismatch {
                index: 1,
                expected: Size::new(2, 2),
                actual: Size::new(2, 3),
            })
        );
    }

    #[test]
    fn test_exported_ids_are_validated() {
        let face = Face::from_reader(&Checkerboard).unwrap();
        assert_eq!(
            face.clone().with_exported_glyph_ids([0, 2]),
            Err(Error::ExportedGlyphOutOfRange { index: 2, count: 2 })
        );
        let face = face.with_exported_glyph_ids([1]).unwrap();
        assert!(face.is_exported(1));
        assert!(!face.is_exported(0));
        assert_eq!(face.export_all().exported_glyph_ids().len(), 2);
    }

    #[test]
    fn test_trimmed_face() {
        let glyph = Glyph::from_art(&["..", "X.", ".X", ".."]).unwrap();
        let face = Face::new(glyph.size(), vec![glyph]).unwrap().export_all();
        let trimmed = face.trimmed(Margins::vertical(1, 1)).unwrap();
        assert_eq!(trimmed.glyph_size(), Size::new(2, 2));
        assert_eq!(trimmed.glyph_at(0).unwrap().to_art(), vec!["X.", ".X"]);
        assert!(trimmed.is_exported(0));
        assert_eq!(face.trimmed(Margins::vertical(2, 2)), Err(Error::ZeroSize(Size::new(2, 0))));
    }

    #[cfg(all(feature = "serde-serialize", feature = "serde-deserialize"))]
    #[test]
    fn test_face_ron_snapshot() {
        let source = r#"(glyphs: [["X.", ".X"], ["..", "XX"]], exported: [1])"#;
        let face: Face = ron::from_str(source).unwrap();
        assert_eq!(face.glyph_size(), Size::new(2, 2));
        assert!(face.is_exported(1));

        let written = ron::to_string(&face).unwrap();
        let reread: Face = ron::from_str(&written).unwrap();
        assert_eq!(reread, face);

        let bad = r#"(glyphs: [["X.", ".X"]], exported: [3])"#;
        assert!(ron::from_str::<Face>(bad).is_err());
    }
}
