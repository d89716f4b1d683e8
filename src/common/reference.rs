//! Column-number and A1-reference conversions.
//!
//! Columns and rows are 1-based throughout the crate: column 1 is `A`,
//! column 26 is `Z`, column 27 is `AA`.

use std::fmt::Write as FmtWrite;

/// Largest column number a worksheet can address (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row number a worksheet can address.
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a 1-based column number to its letters (`1 -> "A"`, `27 -> "AA"`).
///
/// Column 0 has no letters and yields an empty string.
pub fn column_to_letters(column: u32) -> String {
    let mut buf = [0u8; 8];
    let mut len = 0;
    let mut col = column;

    while col > 0 && len < buf.len() {
        col -= 1;
        buf[len] = (col % 26) as u8 + b'A';
        len += 1;
        col /= 26;
    }

    buf[..len].iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters (case-insensitive) to a 1-based column number.
///
/// Returns `None` for empty input, non-letters or overflow.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut column = 0u32;
    for byte in letters.bytes() {
        if !byte.is_ascii_alphabetic() {
            return None;
        }
        column = column
            .checked_mul(26)?
            .checked_add((byte.to_ascii_uppercase() - b'A' + 1) as u32)?;
    }
    Some(column)
}

/// Build an A1-style reference from a 1-based row and column.
pub fn cell_reference(row: u32, column: u32) -> String {
    let mut reference = column_to_letters(column);
    let _ = write!(reference, "{}", row);
    reference
}

/// Split an A1-style reference into `(column, row)`, both 1-based.
pub fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    if split == 0 {
        return None;
    }

    let column = letters_to_column(&reference[..split])?;
    let row = atoi_simd::parse::<u32, false, false>(reference[split..].as_bytes()).ok()?;
    if row == 0 {
        return None;
    }
    Some((column, row))
}
