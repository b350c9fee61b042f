//! Offset lookup table for subset export.
//!
//! The data array of a subset export only holds exported glyphs, so a second
//! array maps every glyph index up to the last exported one onto the offset of
//! its bytes in the data array. Indices that were not exported map to `0`.

use std::collections::BTreeSet;

use crate::idiom::{Idiom, IdiomSink, Value, ValueWidth};
use crate::Indentation;

/// Name of the generated lookup table array.
pub const LUT_NAME: &str = "lut";

/// Smallest element width able to hold `max_offset`.
#[must_use]
pub fn lut_width(max_offset: u64) -> ValueWidth {
    if max_offset < 1 << 8 {
        ValueWidth::U8
    } else if max_offset < 1 << 16 {
        ValueWidth::U16
    } else if max_offset < 1 << 32 {
        ValueWidth::U32
    } else {
        ValueWidth::U64
    }
}

/// Table entries for indices `0..=max(exported_ids)`.
///
/// The `k`-th exported glyph (ascending) gets offset `k * bytes_per_glyph`;
/// every other index gets `0`.
#[must_use]
pub fn lut_offsets(exported_ids: &BTreeSet<usize>, bytes_per_glyph: u64) -> Vec<u64> {
    let Some(&last) = exported_ids.last() else {
        return Vec::new();
    };

    let mut offsets = vec![0; last + 1];
    for (k, &id) in exported_ids.iter().enumerate() {
        offsets[id] = k as u64 * bytes_per_glyph;
    }
    offsets
}

/// Emits the lookup table array.
///
/// Every exported entry gets a row of its own, followed by `comment_for(index)`.
/// Runs of placeholder entries share one row, closed by the next exported entry.
pub fn write_lut<F>(
    sink: &mut IdiomSink,
    exported_ids: &BTreeSet<usize>,
    bytes_per_glyph: u64,
    indentation: Indentation,
    mut comment_for: F,
) where
    F: FnMut(usize) -> String,
{
    let offsets = lut_offsets(exported_ids, bytes_per_glyph);
    let max_offset = exported_ids.len().saturating_sub(1) as u64 * bytes_per_glyph;
    let width = lut_width(max_offset);
    log::debug!("lookup table: {} entries, max offset {max_offset}, {width:?}", offsets.len());

    sink.emit(&Idiom::BeginArray { name: LUT_NAME, width });

    let mut is_previous_exported = true;
    for (index, offset) in offsets.into_iter().enumerate() {
        if exported_ids.contains(&index) {
            if !is_previous_exported {
                sink.emit(&Idiom::LineBreak);
            }
            let comment = comment_for(index);
            sink.emit(&Idiom::BeginArrayRow { indentation })
                .emit(&Idiom::Value(Value::new(width, offset)))
                .emit(&Idiom::Comment(&comment))
                .emit(&Idiom::LineBreak);
            is_previous_exported = true;
        } else {
            if is_previous_exported {
                sink.emit(&Idiom::BeginArrayRow { indentation });
            }
            sink.emit(&Idiom::Value(Value::new(width, 0)));
            is_previous_exported = false;
        }
    }

    sink.emit(&Idiom::EndArray);
}
