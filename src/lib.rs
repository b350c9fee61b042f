//! Bitmap font to source code generator.
//!
//! A [`Face`] is a set of equally sized monochrome glyphs. The generator packs
//! every glyph into bytes and writes them as a source code array, ready to be
//! compiled into firmware or imported from a script.
//!
//! # Usage
//! ```
//! use glyph_source::{BitNumbering, ExportMethod, Face, Format, Glyph, SourceCodeOptions};
//!
//! let nine = Glyph::from_art(&[
//!     "..XXXX..",
//!     ".XX..XX.",
//!     ".XX..XX.",
//!     "..XXXXX.",
//!     ".....XX.",
//!     ".....XX.",
//!     ".XX..XX.",
//!     "..XXXX..",
//!     "........",
//! ])?;
//! let face = Face::new(nine.size(), vec![nine])?;
//!
//! let options = SourceCodeOptions {
//!     export_method: ExportMethod::ExportAll,
//!     bit_numbering: BitNumbering::Msb,
//!     ..SourceCodeOptions::default()
//! };
//! let code = glyph_source::generate(&face, options, Format::C, "font")?;
//! assert!(code.contains("const unsigned char font[] = {"));
//! assert!(code.contains("0x3C,0x66,0x66,0x3E,0x06,0x06,0x66,0x3C,0x00,"));
//! # Ok::<(), glyph_source::Error>(())
//! ```
//!
//! ## Subset export
//! With [`ExportMethod::ExportSelected`] only the glyphs in
//! [`Face::exported_glyph_ids`] are written, followed by a `lut` array mapping
//! each glyph index to the offset of its bytes (see [`lut`]).
//!
//! ## Formats
//! | Identifier | Output |
//! |---|---|
//! | `c` | `const unsigned char font[] = { 0x3C, ... };` |
//! | `arduino` | `const uint8_t font[] PROGMEM = { 0x3C, ... };` |
//! | `python-list` | `font = [ 0x3C, ... ]` |
//! | `python-bytes` | `font = b'' '\x3C...'` |

#![cfg_attr(docs_rs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

mod data;
mod error;
mod format;
mod generator;
pub mod idiom;
pub mod lut;
pub mod margins;
pub mod packer;
pub mod worker;

pub use data::{Face, FaceReader, Glyph, Margins, Point, Size};
pub use error::{Error, Result};
pub use format::Format;
pub use generator::{generate, BitNumbering, ExportMethod, SourceCodeGenerator, SourceCodeOptions};
pub use idiom::{Idiom, IdiomSink, Indentation, Value, ValueWidth};
pub use worker::GenerationQueue;

#[cfg(feature = "bin")]
mod cli;

#[cfg(feature = "bin")]
pub use cli::{run, Args, CliError};
