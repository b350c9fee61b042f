//! Serialization of glyph pixels into bytes.
//!
//! Pixels are walked in row-major order. Every pixel row starts a new byte,
//! unused trailing bits of a row stay zero, so a glyph of width `w` and height
//! `h` always packs into `h * ceil(w / 8)` bytes:
//!
//! ```text
//! '9' (8 pixels wide, MSB)
//! ..XXXX.. -> 0x3C
//! .XX..XX. -> 0x66
//! .XX..XX. -> 0x66
//! ..XXXXX. -> 0x3E
//! .....XX. -> 0x06
//! .....XX. -> 0x06
//! .XX..XX. -> 0x66
//! ..XXXX.. -> 0x3C
//! ........ -> 0x00
//! ```

use crate::{BitNumbering, Glyph, Margins, SourceCodeOptions};

const BYTE_SIZE: usize = 8;

/// Packs a row-major pixel run of rows `width` pixels wide.
///
/// `pixels.len()` is expected to be a multiple of `width`; a trailing partial
/// row is flushed like a complete one.
#[must_use]
pub fn pack_glyph(pixels: &[bool], width: usize, options: &SourceCodeOptions) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len().div_ceil(width.max(1)) * width.div_ceil(BYTE_SIZE));
    let mut bits = 0u8;
    let mut bit_pos = 0;
    let mut col = 0;

    let mut flush = |bits: &mut u8| {
        let byte = if options.invert_bits { !*bits } else { *bits };
        bytes.push(byte);
        *bits = 0;
    };

    for &pixel in pixels {
        if pixel {
            bits |= match options.bit_numbering {
                BitNumbering::Lsb => 1 << bit_pos,
                BitNumbering::Msb => 1 << (BYTE_SIZE - 1 - bit_pos),
            };
        }

        bit_pos += 1;
        col += 1;

        if col >= width {
            flush(&mut bits);
            bit_pos = 0;
            col = 0;
        } else if bit_pos >= BYTE_SIZE {
            flush(&mut bits);
            bit_pos = 0;
        }
    }

    if col > 0 {
        flush(&mut bits);
    }

    bytes
}

/// Packs `glyph` after dropping `pixel_margins.top` leading and
/// `pixel_margins.bottom` trailing pixels.
#[must_use]
pub fn pack_trimmed(glyph: &Glyph, pixel_margins: Margins, options: &SourceCodeOptions) -> Vec<u8> {
    let pixels = glyph.pixels();
    let end = pixels.len().saturating_sub(pixel_margins.bottom).max(pixel_margins.top);
    pack_glyph(&pixels[pixel_margins.top..end], glyph.size().width, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{margins::pixel_margins, Size};

    const NINE: [&str; 9] = [
        "..XXXX..", ".XX..XX.", ".XX..XX.", "..XXXXX.", ".....XX.", ".....XX.", ".XX..XX.", "..XXXX..", "........",
    ];

    const A: [&str; 15] = [
        "...######........",
        "...#######.......",
        ".......###.......",
        "......##.##......",
        "......##.##......",
        ".....##...##.....",
        ".....##...##.....",
        "....##....##.....",
        "....#########....",
        "...##########....",
        "...##.......##...",
        "..##........##...",
        "######...#######.",
        "######...#######.",
        ".................",
    ];

    fn options(bit_numbering: BitNumbering, invert_bits: bool) -> SourceCodeOptions {
        SourceCodeOptions {
            bit_numbering,
            invert_bits,
            ..SourceCodeOptions::default()
        }
    }

    fn pack(art: &[&str], options: &SourceCodeOptions) -> Vec<u8> {
        let glyph = Glyph::from_art(art).unwrap();
        pack_glyph(glyph.pixels(), glyph.size().width, options)
    }

    #[test]
    fn test_nine_msb() {
        let bytes = pack(&NINE, &options(BitNumbering::Msb, false));
        assert_eq!(bytes, [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x66, 0x3C, 0x00]);
    }

    #[test]
    fn test_nine_lsb() {
        let bytes = pack(&NINE, &options(BitNumbering::Lsb, false));
        assert_eq!(bytes, [0x3C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x66, 0x3C, 0x00]);
    }

    #[test]
    fn test_wide_glyph_msb() {
        let bytes = pack(&A, &options(BitNumbering::Msb, false));
        assert_eq!(bytes.len(), Size::new(17, 15).bytes_per_glyph());
        assert_eq!(&bytes[..6], &[0x1F, 0x80, 0x00, 0x1F, 0xC0, 0x00]);
        assert_eq!(&bytes[36..39], &[0xFC, 0x7F, 0x00]);
        assert_eq!(&bytes[42..], &[0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_row_on_byte_boundary_has_no_padding_byte() {
        let bytes = pack(&["XXXXXXXXX.......", "................"], &options(BitNumbering::Lsb, false));
        assert_eq!(bytes, [0xFF, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_lsb_is_bit_reverse_of_msb() {
        let lsb = pack(&A, &options(BitNumbering::Lsb, false));
        let msb = pack(&A, &options(BitNumbering::Msb, false));
        assert_eq!(lsb.len(), msb.len());
        for (l, m) in lsb.iter().zip(&msb) {
            assert_eq!(l.reverse_bits(), *m);
        }
    }

    #[test]
    fn test_inversion() {
        let plain = pack(&NINE, &options(BitNumbering::Lsb, false));
        let inverted = pack(&NINE, &options(BitNumbering::Lsb, true));
        assert_eq!(inverted[0], 0xC3);
        // padding bits are inverted as well
        assert_eq!(inverted[8], 0xFF);
        for (p, i) in plain.iter().zip(&inverted) {
            assert_eq!(!i, *p);
        }
    }

    #[test]
    fn test_bytes_per_glyph_is_independent_of_options() {
        for width in 1..=20 {
            let glyph = Glyph::new(Size::new(width, 3)).unwrap();
            for numbering in [BitNumbering::Lsb, BitNumbering::Msb] {
                for invert in [false, true] {
                    let bytes = pack_glyph(glyph.pixels(), width, &options(numbering, invert));
                    assert_eq!(bytes.len(), glyph.size().bytes_per_glyph());
                }
            }
        }
    }

    #[test]
    fn test_pack_trimmed() {
        let glyph = Glyph::from_art(&NINE).unwrap();
        let margins = pixel_margins(Margins::vertical(1, 1), glyph.size());
        let bytes = pack_trimmed(&glyph, margins, &options(BitNumbering::Msb, false));
        assert_eq!(bytes, [0x66, 0x66, 0x3E, 0x06, 0x06, 0x66, 0x3C]);
    }
}
