use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Coord;
use crate::range::RangeRef;
use crate::registry::SheetId;

/// Identifier for a table within its registry.
///
/// Ids are handles, not positions: they stay valid across later insertions
/// and are resolved through [`crate::TableRegistry::table`].
pub type TableId = u32;

/// Maximum length of a table name in characters.
pub const TABLE_NAME_MAX_LEN: usize = 255;

/// Errors that can occur when creating or mutating a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table name cannot be empty")]
    EmptyName,
    #[error("table name exceeds the 255 character limit")]
    NameTooLong,
    #[error("table name must start with an ASCII letter or '_'")]
    InvalidStartChar,
    #[error("table name contains invalid character '{ch}'")]
    InvalidChar { ch: char },
    #[error("table name conflicts with a cell or range address")]
    ConflictsWithCellReference,
    #[error("table name already exists on this sheet")]
    DuplicateName,
    #[error("table must have at least one column")]
    EmptyColumns,
    #[error("table must span at least one data row")]
    ZeroRows,
    #[error("table area extends beyond the grid bounds")]
    RangeOutOfBounds,
    #[error("table area overlaps existing table '{name}'")]
    OverlappingRange { name: String },
    #[error("table not found")]
    TableNotFound,
    #[error("table range is too small for its header row")]
    InvalidRange,
}

/// Validate a table name.
///
/// - Names are non-empty and at most [`TABLE_NAME_MAX_LEN`] characters.
/// - The first character must be an ASCII letter or `_`.
/// - Remaining characters may be ASCII letters, digits, `_`, or `.`.
/// - Names may not parse as an A1 cell or range address (e.g. `B2`), which
///   would make them ambiguous wherever names and addresses share a string
///   surface.
///
/// Per-sheet uniqueness is enforced by [`crate::TableRegistry`].
pub fn validate_table_name(name: &str) -> Result<(), TableError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TableError::EmptyName);
    }
    if name.chars().count() > TABLE_NAME_MAX_LEN {
        return Err(TableError::NameTooLong);
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(TableError::EmptyName);
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(TableError::InvalidStartChar);
    }

    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '.') {
            return Err(TableError::InvalidChar { ch });
        }
    }

    if RangeRef::from_a1(name).is_ok() {
        return Err(TableError::ConflictsWithCellReference);
    }

    Ok(())
}

/// A named rectangular region bound to one worksheet.
///
/// The stored range always includes the header row; [`Table::data_range`] is
/// the view most callers want. Tables are created only through
/// [`crate::TableRegistry::add`], which owns the record; a [`TableId`] is a
/// handle into the registry, and the `sheet` field is the non-owning
/// back-reference to the grid the table lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    name: String,
    range: RangeRef,
    column_names: Vec<String>,
    sheet: SheetId,
}

impl Table {
    pub(crate) fn new(
        id: TableId,
        name: String,
        range: RangeRef,
        column_names: Vec<String>,
        sheet: SheetId,
    ) -> Self {
        Self {
            id,
            name,
            range,
            column_names,
            sheet,
        }
    }

    /// Stable id of this table within its registry.
    #[inline]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Name of this table.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the worksheet this table belongs to.
    #[inline]
    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    /// The full stored area, header row included.
    #[inline]
    pub fn range(&self) -> RangeRef {
        self.range
    }

    /// The table's data area: the stored range with the header row dropped.
    ///
    /// Always non-empty: the registry guarantees at least one data row
    /// below the header.
    pub fn data_range(&self) -> RangeRef {
        let tl = self.range.top_left;
        RangeRef::new(Coord::new(tl.col, tl.row + 1), self.range.bottom_right)
    }

    /// The header row of the table (its first stored row).
    pub fn header_range(&self) -> RangeRef {
        let tl = self.range.top_left;
        RangeRef::new(tl, Coord::new(self.range.bottom_right.col, tl.row))
    }

    /// Number of columns this table has.
    #[inline]
    pub fn column_len(&self) -> usize {
        self.column_names.len()
    }

    /// The column names of this table, in grid order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    /// Position of the named column, matched ASCII-case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// The one-column strip of the data range under the named header.
    pub fn column_range(&self, name: &str) -> Option<RangeRef> {
        let idx = self.column_index(name)? as u32;
        let data = self.data_range();
        let col = data.top_left.col + idx;
        Some(RangeRef::new(
            Coord::new(col, data.top_left.row),
            Coord::new(col, data.bottom_right.row),
        ))
    }

    /// Rename this table.
    ///
    /// Mutates the record directly and does **not** re-check uniqueness
    /// against sibling tables; callers going through
    /// [`crate::TableRegistry::rename`] get that check.
    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }

    /// Swap in a new stored range, keeping the column list in sync with the
    /// new width: surplus names are dropped, missing ones get generated
    /// `Column{n}` defaults that avoid the names already present.
    pub(crate) fn set_range(&mut self, new_range: RangeRef) {
        let new_len = new_range.width() as usize;
        if new_len < self.column_names.len() {
            self.column_names.truncate(new_len);
        } else {
            let mut next = 1u32;
            while self.column_names.len() < new_len {
                let candidate = format!("Column{next}");
                next += 1;
                if self
                    .column_names
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(&candidate))
                {
                    continue;
                }
                self.column_names.push(candidate);
            }
        }
        self.range = new_range;
    }
}
