//! Character transform between the on-disk code units and UTF-16.
//!
//! Stored code units are bitwise complemented. Before complementing, the
//! writer folds the 32 Unicode characters that Windows-1252 places at
//! `0x80..=0x9F` back onto those single byte values.

use widestring::{U16Str, U16String};

/// Unicode code points of Windows-1252 bytes `0x80..=0x9F`, by position
pub const CP1252_TABLE: [u16; 32] = [
    0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x008D, 0x017D, 0x008F, //
    0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178, //
];

const CP1252_FIRST: u16 = 0x80;
const CP1252_LAST: u16 = 0x9F;

#[inline]
fn complement(unit: u16) -> u16 {
    let [lo, hi] = unit.to_le_bytes();
    u16::from_le_bytes([!lo, !hi])
}

/// Turn a stored code unit into a UTF-16 code unit
#[inline]
pub fn decode_unit(stored: u16) -> u16 {
    let unit = complement(stored);
    if (CP1252_FIRST..=CP1252_LAST).contains(&unit) {
        CP1252_TABLE[(unit - CP1252_FIRST) as usize]
    } else {
        unit
    }
}

/// Turn a UTF-16 code unit into its stored form
#[inline]
pub fn encode_unit(unit: u16) -> u16 {
    let folded = match CP1252_TABLE.iter().position(|&c| c == unit) {
        Some(index) => CP1252_FIRST + index as u16,
        None => unit,
    };
    complement(folded)
}

/// Decode little endian stored code units. A trailing odd byte is ignored.
pub fn decode_bytes(data: &[u8]) -> U16String {
    U16String::from_vec(
        data.chunks_exact(2)
            .map(|pair| decode_unit(u16::from_le_bytes([pair[0], pair[1]])))
            .collect::<Vec<_>>(),
    )
}

/// Encode a string into little endian stored code units
pub fn encode_str(value: &U16Str) -> Vec<u8> {
    value
        .as_slice()
        .iter()
        .flat_map(|&unit| encode_unit(unit).to_le_bytes())
        .collect()
}
