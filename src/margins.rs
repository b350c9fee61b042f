//! Whole-face trimming of uniformly blank rows.

use crate::{Face, Margins, Size};

/// Largest top/bottom line margins that are blank in every glyph of `face`.
///
/// The margin is common to the whole face, so every glyph keeps the same
/// trimmed size. Blank glyphs do not constrain it. Faces with fewer than two
/// glyphs, or with no set pixel at all, are never trimmed.
#[must_use]
pub fn calculate_margins(face: &Face) -> Margins {
    if face.num_glyphs() < 2 {
        return Margins::default();
    }

    let bounds = face
        .glyphs()
        .iter()
        .filter(|glyph| !glyph.is_blank())
        .map(|glyph| (glyph.leading_blank_rows(), glyph.trailing_blank_rows()))
        .reduce(|(top, bottom), (t, b)| (top.min(t), bottom.min(b)));

    match bounds {
        Some((top, bottom)) => Margins::vertical(top, bottom),
        None => Margins::default(),
    }
}

/// Converts line margins into offsets into a flattened pixel buffer.
#[must_use]
pub fn pixel_margins(line_margins: Margins, glyph_size: Size) -> Margins {
    Margins::vertical(line_margins.top * glyph_size.width, line_margins.bottom * glyph_size.width)
}
