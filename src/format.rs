//! Output syntaxes and their idiom renderers.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::idiom::{Idiom, Value, ValueWidth};

/// Target source code syntax.
///
/// Each variant is a stateless mapping from [`Idiom`] to text; adding a format
/// means adding a variant and its renderer, the packer is not involved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Format {
    /// C/C++ `const unsigned char` arrays.
    #[default]
    C,
    /// Arduino `PROGMEM` arrays.
    Arduino,
    /// Python list of integers.
    PythonList,
    /// Python `bytes` literal.
    PythonBytes,
}

impl Format {
    /// Every format, in registration order.
    pub const ALL: [Format; 4] = [Format::C, Format::Arduino, Format::PythonList, Format::PythonBytes];

    /// Stable identifier, suitable for persisting a selection.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Arduino => "arduino",
            Self::PythonList => "python-list",
            Self::PythonBytes => "python-bytes",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::C => "C/C++",
            Self::Arduino => "Arduino",
            Self::PythonList => "Python List",
            Self::PythonBytes => "Python Bytes",
        }
    }

    /// Renders one idiom as a text fragment.
    #[must_use]
    pub fn render(self, idiom: &Idiom<'_>) -> Cow<'static, str> {
        match self {
            Self::C => c(idiom),
            Self::Arduino => arduino(idiom),
            Self::PythonList => python_list(idiom),
            Self::PythonBytes => python_bytes(idiom),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.identifier() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_owned()))
    }
}

fn header(comment: &str, name: &str, size: crate::Size, timestamp: &str) -> String {
    format!(
        "{comment}\n{comment} Font Data\n{comment} Font: {name}\n{comment} Size: {size}\n{comment} Created: {timestamp}\n{comment}\n"
    )
}

fn hex_value(value: Value) -> String {
    format!("0x{:02X},", value.value)
}

fn c_type(width: ValueWidth) -> &'static str {
    match width {
        ValueWidth::U8 => "unsigned char",
        ValueWidth::U16 => "unsigned short",
        ValueWidth::U32 => "unsigned long",
        ValueWidth::U64 => "unsigned long long",
    }
}

fn stdint_type(width: ValueWidth) -> &'static str {
    match width {
        ValueWidth::U8 => "uint8_t",
        ValueWidth::U16 => "uint16_t",
        ValueWidth::U32 => "uint32_t",
        ValueWidth::U64 => "uint64_t",
    }
}

fn c(idiom: &Idiom<'_>) -> Cow<'static, str> {
    match *idiom {
        Idiom::Begin { name, size, timestamp } => header("//", name, size, timestamp).into(),
        Idiom::BeginArray { name, width } => format!("\n\nconst {} {name}[] = {{\n", c_type(width)).into(),
        Idiom::BeginArrayRow { indentation } => indentation.to_string().into(),
        Idiom::Value(value) => hex_value(value).into(),
        Idiom::Comment(text) => format!(" // {text}").into(),
        Idiom::LineBreak => "\n".into(),
        Idiom::EndArray => "};\n".into(),
        Idiom::End => "\n\n".into(),
    }
}

fn arduino(idiom: &Idiom<'_>) -> Cow<'static, str> {
    match *idiom {
        Idiom::Begin { .. } => format!("{}\n#include <Arduino.h>\n", c(idiom)).into(),
        Idiom::BeginArray { name, width } => {
            format!("\n\nconst {} {name}[] PROGMEM = {{\n", stdint_type(width)).into()
        }
        _ => c(idiom),
    }
}

fn python_list(idiom: &Idiom<'_>) -> Cow<'static, str> {
    match *idiom {
        Idiom::Begin { name, size, timestamp } => header("#", name, size, timestamp).into(),
        Idiom::BeginArray { name, .. } => format!("\n\n{name} = [\n").into(),
        Idiom::Comment(text) => format!(" # {text}").into(),
        Idiom::EndArray => "\n]\n".into(),
        _ => c(idiom),
    }
}

fn python_bytes(idiom: &Idiom<'_>) -> Cow<'static, str> {
    match *idiom {
        Idiom::Begin { name, size, timestamp } => header("#", name, size, timestamp).into(),
        Idiom::BeginArray { name, .. } => format!("\n\n{name} = b'' \\\n").into(),
        Idiom::BeginArrayRow { indentation } => format!("{indentation}'").into(),
        // wide values become little-endian byte runs so the literal stays a packed array
        Idiom::Value(value) => value.value.to_le_bytes()[..value.width.bytes()]
            .iter()
            .map(|byte| format!("\\x{byte:02X}"))
            .collect::<String>()
            .into(),
        Idiom::Comment(_) | Idiom::EndArray => "".into(),
        Idiom::LineBreak => "' \\\n".into(),
        Idiom::End => "\n\n".into(),
    }
}
