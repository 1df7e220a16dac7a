use core::fmt;

use serde::{Deserialize, Serialize};

/// Highest valid 1-based column index (column `XFD`).
pub const MAX_COLS: u32 = 16_384;
/// Highest valid 1-based row index.
pub const MAX_ROWS: u32 = 1_048_576;

/// A single cell address within a worksheet grid.
///
/// Columns and rows are **1-based**:
/// - `col = 1` is column `A`
/// - `row = 1` is row `1`
///
/// `new` does not validate; callers supply components in
/// `1..=MAX_COLS` / `1..=MAX_ROWS`. Parsing and [`Coord::offset`] enforce
/// the domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// 1-based column.
    pub col: u32,
    /// 1-based row.
    pub row: u32,
}

impl Coord {
    /// Construct a new [`Coord`].
    #[inline]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Shift both components by the given deltas.
    ///
    /// Negative deltas are allowed. A result outside `1..=MAX_COLS` /
    /// `1..=MAX_ROWS` is an error, never a clamp.
    pub fn offset(self, cols: i64, rows: i64) -> Result<Self, OffsetError> {
        let col = i64::from(self.col) + cols;
        let row = i64::from(self.row) + rows;
        if col < 1 || col > i64::from(MAX_COLS) {
            return Err(OffsetError::ColumnOutOfRange);
        }
        if row < 1 || row > i64::from(MAX_ROWS) {
            return Err(OffsetError::RowOutOfRange);
        }
        Ok(Self::new(col as u32, row as u32))
    }

    /// Convert to A1 notation (e.g. `A1`, `BC32`).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_name(self.col), self.row)
    }

    /// Parse an A1-style cell address (e.g. `A1`, `$B$2`, `bc32`).
    ///
    /// `$` absolute markers and lowercase letters are accepted; the emitted
    /// form is always uppercase without markers.
    pub fn from_a1(a1: &str) -> Result<Self, CellParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(CellParseError::Empty);
        }

        let bytes = s.as_bytes();
        let mut idx = 0usize;
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(CellParseError::MissingColumn);
        }
        let col_str = &s[col_start..idx];

        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start {
            return Err(CellParseError::MissingRow);
        }
        if idx != bytes.len() {
            return Err(CellParseError::TrailingCharacters);
        }

        let col = name_to_col(col_str)?;
        if col > MAX_COLS {
            return Err(CellParseError::InvalidColumn);
        }
        let row: u32 = s[row_start..idx]
            .parse()
            .map_err(|_| CellParseError::InvalidRow)?;
        if row == 0 || row > MAX_ROWS {
            return Err(CellParseError::InvalidRow);
        }

        Ok(Self { col, row })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Errors that can occur when parsing an A1 cell address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellParseError {
    Empty,
    MissingColumn,
    MissingRow,
    InvalidColumn,
    InvalidRow,
    TrailingCharacters,
}

impl fmt::Display for CellParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CellParseError::Empty => "empty cell address",
            CellParseError::MissingColumn => "missing column in cell address",
            CellParseError::MissingRow => "missing row in cell address",
            CellParseError::InvalidColumn => "invalid column in cell address",
            CellParseError::InvalidRow => "invalid row in cell address",
            CellParseError::TrailingCharacters => "trailing characters in cell address",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CellParseError {}

/// Error raised when a coordinate shift would leave the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OffsetError {
    ColumnOutOfRange,
    RowOutOfRange,
}

impl fmt::Display for OffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            OffsetError::ColumnOutOfRange => "column offset leaves the grid",
            OffsetError::RowOutOfRange => "row offset leaves the grid",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for OffsetError {}

fn col_to_name(col: u32) -> String {
    let mut n = col;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).expect("column letters are always valid UTF-8")
}

fn name_to_col(s: &str) -> Result<u32, CellParseError> {
    let mut col: u32 = 0;
    for b in s.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(CellParseError::InvalidColumn);
        }
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or(CellParseError::InvalidColumn)?;
    }
    if col == 0 {
        return Err(CellParseError::InvalidColumn);
    }
    Ok(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_roundtrip() {
        let c = Coord::new(1, 1);
        assert_eq!(c.to_a1(), "A1");
        assert_eq!(Coord::from_a1("A1").unwrap(), c);
        assert_eq!(Coord::from_a1("$A$1").unwrap(), c);

        let c2 = Coord::new(55, 32); // BC32
        assert_eq!(c2.to_a1(), "BC32");
        assert_eq!(Coord::from_a1("bc32").unwrap(), c2);
    }

    #[test]
    fn a1_bounds() {
        assert!(Coord::from_a1("XFD1048576").is_ok());
        assert!(Coord::from_a1("XFE1").is_err()); // col 16385 is out of bounds
        assert!(Coord::from_a1("A1048577").is_err());
        assert!(Coord::from_a1("A0").is_err());
    }

    #[test]
    fn a1_rejects_malformed_input() {
        assert_eq!(Coord::from_a1("").unwrap_err(), CellParseError::Empty);
        assert_eq!(
            Coord::from_a1("12").unwrap_err(),
            CellParseError::MissingColumn
        );
        assert_eq!(Coord::from_a1("AB").unwrap_err(), CellParseError::MissingRow);
        assert_eq!(
            Coord::from_a1("A1x").unwrap_err(),
            CellParseError::TrailingCharacters
        );
    }

    #[test]
    fn offset_shifts_both_axes() {
        let c = Coord::new(3, 10);
        assert_eq!(c.offset(2, -4).unwrap(), Coord::new(5, 6));
        assert_eq!(c.offset(0, 0).unwrap(), c);
    }

    #[test]
    fn offset_errors_instead_of_clamping() {
        let origin = Coord::new(1, 1);
        assert_eq!(
            origin.offset(-1, 0).unwrap_err(),
            OffsetError::ColumnOutOfRange
        );
        assert_eq!(origin.offset(0, -1).unwrap_err(), OffsetError::RowOutOfRange);
        assert_eq!(
            origin.offset(i64::from(MAX_COLS), 0).unwrap_err(),
            OffsetError::ColumnOutOfRange
        );
        assert_eq!(
            origin.offset(0, i64::from(MAX_ROWS)).unwrap_err(),
            OffsetError::RowOutOfRange
        );
    }
}
