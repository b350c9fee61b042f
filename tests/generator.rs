use glyph_source::{
    BitNumbering, Error, ExportMethod, Face, Format, Glyph, Indentation, Size, SourceCodeGenerator, SourceCodeOptions,
};
use pretty_assertions::assert_eq;

const NINE: [&str; 9] = [
    "..XXXX..", ".XX..XX.", ".XX..XX.", "..XXXXX.", ".....XX.", ".....XX.", ".XX..XX.", "..XXXX..", "........",
];

fn nine() -> Face {
    let glyph = Glyph::from_art(&NINE).unwrap();
    Face::new(glyph.size(), vec![glyph]).unwrap()
}

fn generator(options: SourceCodeOptions) -> SourceCodeGenerator {
    SourceCodeGenerator::new(options).with_timestamp("2024-05-01 12:00:00")
}

fn export_all(bit_numbering: BitNumbering) -> SourceCodeOptions {
    SourceCodeOptions {
        export_method: ExportMethod::ExportAll,
        bit_numbering,
        ..SourceCodeOptions::default()
    }
}

/// Face of `count` glyphs, 16x8, where glyph `i` has its first row set to `i`.
fn numbered_face(count: usize) -> Face {
    let glyphs = (0..count)
        .map(|i| {
            let mut pixels = vec![false; 16 * 8];
            for bit in 0..16 {
                pixels[bit] = i & (1 << bit) != 0;
            }
            Glyph::from_pixels(Size::new(16, 8), pixels).unwrap()
        })
        .collect();
    Face::new(Size::new(16, 8), glyphs).unwrap()
}

#[test]
fn test_nine_in_c() {
    let code = generator(export_all(BitNumbering::Msb)).generate(&nine(), Format::C, "font").unwrap();
    assert_eq!(
        code,
        "//\n\
         // Font Data\n\
         // Font: font\n\
         // Size: 8x9\n\
         // Created: 2024-05-01 12:00:00\n\
         //\n\
         \n\
         \n\
         const unsigned char font[] = {\n\
         \t0x3C,0x66,0x66,0x3E,0x06,0x06,0x66,0x3C,0x00, // Character 0x20 ( )\n\
         };\n\
         \n\
         \n"
    );
}

#[test]
fn test_nine_lsb_default_numbering() {
    let code = generator(export_all(BitNumbering::Lsb)).generate(&nine(), Format::C, "font").unwrap();
    assert!(code.contains("\t0x3C,0x66,0x66,0x7C,0x60,0x60,0x66,0x3C,0x00, // Character 0x20 ( )\n"));
}

#[test]
fn test_wrap_column() {
    let options = SourceCodeOptions { wrap_column: 10, ..export_all(BitNumbering::Msb) };
    let code = generator(options).generate(&nine(), Format::C, "font").unwrap();
    assert!(code.contains(
        "= {\n\
         \t0x3C,0x66,\n\
         \t0x66,0x3E,\n\
         \t0x06,0x06,\n\
         \t0x66,0x3C,\n\
         \t0x00, // Character 0x20 ( )\n\
         };\n"
    ));
}

#[test]
fn test_wrap_at_end_of_glyph_leaves_comment_on_own_row() {
    let glyph = Glyph::from_art(&["X.", ".X"]).unwrap();
    let face = Face::new(glyph.size(), vec![glyph]).unwrap();
    let options = SourceCodeOptions { wrap_column: 10, ..export_all(BitNumbering::Lsb) };
    let code = generator(options).generate(&face, Format::C, "font").unwrap();
    assert!(code.contains("= {\n\t0x01,0x02,\n\t // Character 0x20 ( )\n};\n"));
}

#[test]
fn test_wrapping_counts_rendered_columns() {
    // python bytes values are 4 columns wide and rows open with a quote
    let options = SourceCodeOptions { wrap_column: 10, ..export_all(BitNumbering::Msb) };
    let code = generator(options).generate(&nine(), Format::PythonBytes, "font").unwrap();
    assert!(code.contains(
        "font = b'' \\\n\
         \t'\\x3C\\x66' \\\n\
         \t'\\x66\\x3E' \\\n\
         \t'\\x06\\x06' \\\n\
         \t'\\x66\\x3C' \\\n\
         \t'\\x00' \\\n"
    ));
}

#[test]
fn test_python_list() {
    let options = SourceCodeOptions { indentation: Indentation::Spaces(4), ..export_all(BitNumbering::Msb) };
    let code = generator(options).generate(&nine(), Format::PythonList, "digits").unwrap();
    assert_eq!(
        code,
        "#\n\
         # Font Data\n\
         # Font: digits\n\
         # Size: 8x9\n\
         # Created: 2024-05-01 12:00:00\n\
         #\n\
         \n\
         \n\
         digits = [\n    0x3C,0x66,0x66,0x3E,0x06,0x06,0x66,0x3C,0x00, # Character 0x20 ( )\n\
         \n\
         ]\n\
         \n\
         \n"
    );
}

#[test]
fn test_arduino() {
    let code = generator(export_all(BitNumbering::Msb)).generate(&nine(), Format::Arduino, "font").unwrap();
    assert!(code.contains("//\n\n#include <Arduino.h>\n\n\nconst uint8_t font[] PROGMEM = {\n\t0x3C,"));
    assert!(code.ends_with("};\n\n\n"));
}

#[test]
fn test_margins_are_common_to_the_face() {
    let glyphs = vec![
        Glyph::from_art(&["....", "X...", "....", "...."]).unwrap(),
        Glyph::from_art(&["....", "....", "...X", "...."]).unwrap(),
    ];
    let face = Face::new(Size::new(4, 4), glyphs).unwrap();

    let code = generator(export_all(BitNumbering::Lsb)).generate(&face, Format::C, "font").unwrap();
    assert!(code.contains("// Size: 4x2\n"));
    assert!(code.contains("\t0x01,0x00, // Character 0x20 ( )\n\t0x00,0x08, // Character 0x21 (!)\n"));

    let options = SourceCodeOptions { include_line_spacing: true, ..export_all(BitNumbering::Lsb) };
    let code = generator(options).generate(&face, Format::C, "font").unwrap();
    assert!(code.contains("// Size: 4x4\n"));
    assert!(code.contains("\t0x00,0x01,0x00,0x00, // Character 0x20 ( )\n"));
}

#[test]
fn test_subset_export() {
    let face = numbered_face(8).with_exported_glyph_ids([2, 5]).unwrap();
    let options = SourceCodeOptions {
        wrap_column: 200,
        include_line_spacing: true,
        ..SourceCodeOptions::default()
    };
    let code = generator(options).generate(&face, Format::C, "font").unwrap();

    let zeros = "0x00,".repeat(14);
    let expected = format!(
        "\n\nconst unsigned char font[] = {{\n\
         \t0x02,0x00,{zeros} // Character 0x22 (\")\n\
         \t0x05,0x00,{zeros} // Character 0x25 (%)\n\
         }};\n\
         \n\
         \n\
         const unsigned char lut[] = {{\n\
         \t0x00,0x00,\n\
         \t0x00, // Character 0x22 (\")\n\
         \t0x00,0x00,\n\
         \t0x10, // Character 0x25 (%)\n\
         }};\n\
         \n\
         \n"
    );
    assert!(code.ends_with(&expected), "{code}");
}

#[test]
fn test_subset_lut_uses_trimmed_size_and_wider_elements() {
    // 17 exported glyphs of 16 bytes each: max offset 256 needs 16-bit entries
    let face = numbered_face(20).with_exported_glyph_ids(0..17).unwrap();
    let options = SourceCodeOptions { include_line_spacing: true, ..SourceCodeOptions::default() };
    let code = generator(options).generate(&face, Format::Arduino, "font").unwrap();
    assert!(code.contains("const uint16_t lut[] PROGMEM = {\n\t0x00, // Character 0x20 ( )\n\t0x10, "));
    assert!(code.contains("\t0x100, // Character 0x30 (0)\n};"));

    // trimming leaves one row of two bytes per glyph
    let code = generator(SourceCodeOptions::default()).generate(&face, Format::C, "font").unwrap();
    assert!(code.contains("// Size: 16x1\n"));
    assert!(code.contains("const unsigned char lut[] = {\n\t0x00, // Character 0x20 ( )\n\t0x02, "));
}

#[test]
fn test_subset_python_bytes_suppresses_comments() {
    let face = numbered_face(4).with_exported_glyph_ids([1, 3]).unwrap();
    let options = SourceCodeOptions { include_line_spacing: true, wrap_column: 200, ..SourceCodeOptions::default() };
    let code = generator(options).generate(&face, Format::PythonBytes, "font").unwrap();
    assert!(code.ends_with("lut = b'' \\\n\t'\\x00' \\\n\t'\\x00' \\\n\t'\\x00' \\\n\t'\\x10' \\\n\n\n"));
    assert!(!code.contains("Character"));
}

#[test]
fn test_preconditions() {
    let empty = Face::new(Size::new(8, 8), Vec::new()).unwrap();
    assert_eq!(
        glyph_source::generate(&empty, export_all(BitNumbering::Lsb), Format::C, "font"),
        Err(Error::EmptyFace)
    );
    assert_eq!(
        glyph_source::generate(&numbered_face(3), SourceCodeOptions::default(), Format::C, "font"),
        Err(Error::NoExportedGlyphs)
    );
}

#[test]
fn test_every_format_is_registered() {
    let face = nine();
    for format in Format::ALL {
        assert_eq!(format.identifier().parse::<Format>(), Ok(format));
        let code = generator(export_all(BitNumbering::Msb)).generate(&face, format, "font").unwrap();
        assert!(code.contains("Font Data"));
    }
}
