use core::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{CellParseError, Coord, OffsetError};

/// An axis-aligned rectangular region of a worksheet grid.
///
/// Both corners are inclusive and the range is always normalized so that:
/// - `top_left.col <= bottom_right.col`
/// - `top_left.row <= bottom_right.row`
///
/// A range collapsed to a single cell has `top_left == bottom_right`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeRef {
    pub top_left: Coord,
    pub bottom_right: Coord,
}

impl RangeRef {
    /// Construct a new range, normalizing the corners if needed.
    pub const fn new(a: Coord, b: Coord) -> Self {
        let left = if a.col <= b.col { a.col } else { b.col };
        let right = if a.col <= b.col { b.col } else { a.col };
        let top = if a.row <= b.row { a.row } else { b.row };
        let bottom = if a.row <= b.row { b.row } else { a.row };
        Self {
            top_left: Coord::new(left, top),
            bottom_right: Coord::new(right, bottom),
        }
    }

    /// Parse an A1-style range like `A1:B2` or a single-cell address like
    /// `C3` (which yields a 1×1 range).
    pub fn from_a1(a1: &str) -> Result<Self, RangeParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(RangeParseError::Empty);
        }

        match s.split_once(':') {
            None => {
                let cell = Coord::from_a1(s).map_err(RangeParseError::Cell)?;
                Ok(RangeRef::new(cell, cell))
            }
            Some((a, b)) => {
                let start = Coord::from_a1(a).map_err(RangeParseError::Cell)?;
                let end = Coord::from_a1(b).map_err(RangeParseError::Cell)?;
                Ok(RangeRef::new(start, end))
            }
        }
    }

    /// Number of columns in the range.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.bottom_right.col - self.top_left.col + 1
    }

    /// Number of rows in the range.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.bottom_right.row - self.top_left.row + 1
    }

    /// Returns true if the range is exactly one cell.
    #[inline]
    pub const fn is_single_cell(&self) -> bool {
        self.top_left.col == self.bottom_right.col && self.top_left.row == self.bottom_right.row
    }

    /// Returns true if `other` lies entirely within this range.
    #[inline]
    pub const fn contains(&self, other: RangeRef) -> bool {
        self.top_left.col <= other.top_left.col
            && self.top_left.row <= other.top_left.row
            && self.bottom_right.col >= other.bottom_right.col
            && self.bottom_right.row >= other.bottom_right.row
    }

    /// Returns true if `cell` lies within this range.
    #[inline]
    pub const fn contains_cell(&self, cell: Coord) -> bool {
        cell.col >= self.top_left.col
            && cell.col <= self.bottom_right.col
            && cell.row >= self.top_left.row
            && cell.row <= self.bottom_right.row
    }

    /// Returns true if the two rectangles intersect on both axes.
    #[inline]
    pub const fn overlaps_with(&self, other: RangeRef) -> bool {
        self.bottom_right.row >= other.top_left.row
            && self.top_left.row <= other.bottom_right.row
            && self.bottom_right.col >= other.top_left.col
            && self.top_left.col <= other.bottom_right.col
    }

    /// The intersecting sub-rectangle of two ranges, if any.
    pub fn overlap(&self, other: RangeRef) -> Option<RangeRef> {
        if !self.overlaps_with(other) {
            return None;
        }

        let top_left = Coord::new(
            self.top_left.col.max(other.top_left.col),
            self.top_left.row.max(other.top_left.row),
        );
        let bottom_right = Coord::new(
            self.bottom_right.col.min(other.bottom_right.col),
            self.bottom_right.row.min(other.bottom_right.row),
        );
        Some(RangeRef {
            top_left,
            bottom_right,
        })
    }

    /// Shift both corners by the same deltas, preserving width and height.
    pub fn make_offset(self, cols: i64, rows: i64) -> Result<Self, OffsetError> {
        Ok(Self {
            top_left: self.top_left.offset(cols, rows)?,
            bottom_right: self.bottom_right.offset(cols, rows)?,
        })
    }

    /// The synthesized top-right corner.
    #[inline]
    pub const fn top_right(&self) -> Coord {
        Coord::new(self.bottom_right.col, self.top_left.row)
    }

    /// The synthesized bottom-left corner.
    #[inline]
    pub const fn bottom_left(&self) -> Coord {
        Coord::new(self.top_left.col, self.bottom_right.row)
    }
}

/// The canonical form always spells out both corners (`A1:A1` for a single
/// cell), so that a range's string form is unambiguous against a bare cell
/// address.
impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

impl PartialEq<str> for RangeRef {
    fn eq(&self, other: &str) -> bool {
        RangeRef::from_a1(other).is_ok_and(|r| *self == r)
    }
}

impl PartialEq<&str> for RangeRef {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<RangeRef> for str {
    fn eq(&self, other: &RangeRef) -> bool {
        other == self
    }
}

impl PartialEq<RangeRef> for &str {
    fn eq(&self, other: &RangeRef) -> bool {
        other == *self
    }
}

/// Errors that can occur when parsing an A1 range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RangeParseError {
    Empty,
    Cell(CellParseError),
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeParseError::Empty => f.write_str("empty range address"),
            RangeParseError::Cell(e) => write!(f, "invalid cell address in range: {e}"),
        }
    }
}

impl std::error::Error for RangeParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RangeParseError::Empty => None,
            RangeParseError::Cell(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> RangeRef {
        RangeRef::from_a1(s).unwrap()
    }

    #[test]
    fn parses_single_cell_and_two_corner_forms() {
        let single = r("C3");
        assert!(single.is_single_cell());
        assert_eq!(single.top_left, Coord::new(3, 3));

        let rect = r("A1:B2");
        assert_eq!(rect.top_left, Coord::new(1, 1));
        assert_eq!(rect.bottom_right, Coord::new(2, 2));
        assert_eq!(rect.width(), 2);
        assert_eq!(rect.height(), 2);
    }

    #[test]
    fn construction_normalizes_transposed_corners() {
        assert_eq!(r("B2:A1"), r("A1:B2"));
        assert_eq!(
            RangeRef::new(Coord::new(4, 1), Coord::new(2, 3)),
            r("B1:D3")
        );
    }

    #[test]
    fn display_always_uses_the_colon_form() {
        assert_eq!(r("C3").to_string(), "C3:C3");
        assert_eq!(r("A1:B2").to_string(), "A1:B2");
    }

    #[test]
    fn string_equality_parses_before_comparing() {
        assert!(r("A1:B2") == "A1:B2");
        assert!(r("C3") == "C3:C3");
        assert!("B2:A1" == r("A1:B2"));
        assert!(r("A1:B2") != "A1:B3");
        assert!(r("A1:B2") != "not an address");
    }

    #[test]
    fn containment_is_inclusive_on_all_edges() {
        let outer = r("B2:E8");
        assert!(outer.contains(outer));
        assert!(outer.contains(r("B2:B2")));
        assert!(outer.contains(r("E8:E8")));
        assert!(!outer.contains(r("A2:B2")));
        assert!(!outer.contains(r("B2:E9")));

        assert!(outer.contains_cell(Coord::new(2, 2)));
        assert!(outer.contains_cell(Coord::new(5, 8)));
        assert!(!outer.contains_cell(Coord::new(6, 4)));
    }

    #[test]
    fn overlap_returns_the_intersection() {
        let a = r("A1:C3");
        let b = r("B2:D4");
        assert!(a.overlaps_with(b));
        assert_eq!(a.overlap(b), Some(r("B2:C3")));

        // Edge-touching ranges overlap (bounds are inclusive).
        assert_eq!(r("A1:B2").overlap(r("B2:C3")), Some(r("B2:B2")));

        assert!(!a.overlaps_with(r("D4:E5")));
        assert_eq!(a.overlap(r("D4:E5")), None);
    }

    #[test]
    fn make_offset_preserves_shape() {
        let shifted = r("B2:D4").make_offset(2, 3).unwrap();
        assert_eq!(shifted, r("D5:F7"));
        assert_eq!(shifted.width(), 3);
        assert_eq!(shifted.height(), 3);

        assert!(r("A1:B2").make_offset(-1, 0).is_err());
    }

    #[test]
    fn corner_accessors() {
        let rect = r("B2:D5");
        assert_eq!(rect.top_right(), Coord::new(4, 2));
        assert_eq!(rect.bottom_left(), Coord::new(2, 5));
    }
}
