use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::address::Coord;
use crate::range::RangeRef;
use crate::table::{validate_table_name, Table, TableError, TableId};

/// Identifier for a worksheet.
pub type SheetId = u32;

/// The ordered collection of tables on one worksheet.
///
/// The registry owns its [`Table`] records and maintains two invariants
/// across every mutation it exposes: no two tables overlap, and no two
/// tables share a name. Insertion order is preserved and is the iteration
/// order.
///
/// [`TableRegistry::add`] hands back [`TableId`] handles; they stay valid
/// across later insertions and resolve through [`TableRegistry::table`].
#[derive(Clone, Debug, Serialize)]
pub struct TableRegistry {
    /// Id of the worksheet whose tables this registry holds.
    sheet: SheetId,

    /// Table records in insertion order.
    tables: Vec<Table>,

    /// Next table id to allocate (runtime-only).
    #[serde(skip)]
    next_table_id: TableId,
}

impl TableRegistry {
    /// Create an empty registry bound to the given worksheet.
    pub fn new(sheet: SheetId) -> Self {
        Self {
            sheet,
            tables: Vec::new(),
            next_table_id: 1,
        }
    }

    /// Id of the worksheet this registry belongs to.
    #[inline]
    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    /// Number of tables in the registry.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the registry holds no tables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The first table in insertion order.
    pub fn first(&self) -> Option<&Table> {
        self.tables.first()
    }

    /// The last table in insertion order.
    pub fn last(&self) -> Option<&Table> {
        self.tables.last()
    }

    /// The table at the given position in insertion order.
    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    /// Mutable access to the table at the given position.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.tables.get_mut(index)
    }

    /// Resolve a handle issued by [`TableRegistry::add`].
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    /// Mutable counterpart of [`TableRegistry::table`].
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id() == id)
    }

    /// Find a table by name (first match in insertion order).
    pub fn by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Mutable counterpart of [`TableRegistry::by_name`].
    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name() == name)
    }

    /// Create a new table anchored at `top_left` and return its id.
    ///
    /// The stored area spans `column_names.len()` columns and `rows + 1`
    /// rows: the anchor row holds the column headers and `rows` data rows
    /// follow it.
    ///
    /// Fails without modifying the registry if the name is invalid or
    /// already taken, if `column_names` is empty or `rows` is zero, or if
    /// the computed area would overlap an existing table or leave the grid.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        column_names: Vec<String>,
        top_left: Coord,
        rows: u32,
    ) -> Result<TableId, TableError> {
        let name = name.into();
        let name = name.trim().to_string();
        validate_table_name(&name)?;
        if column_names.is_empty() {
            return Err(TableError::EmptyColumns);
        }
        if rows == 0 {
            return Err(TableError::ZeroRows);
        }

        let bottom_right = top_left
            .offset(column_names.len() as i64 - 1, i64::from(rows))
            .map_err(|_| TableError::RangeOutOfBounds)?;
        let area = RangeRef::new(top_left, bottom_right);

        // First conflict in insertion order wins; per table, the overlap
        // check runs before the name check.
        for table in &self.tables {
            if table.range().overlaps_with(area) {
                return Err(TableError::OverlappingRange {
                    name: table.name().to_string(),
                });
            }
            if table.name() == name {
                return Err(TableError::DuplicateName);
            }
        }

        let id = self.next_table_id;
        self.next_table_id = self.next_table_id.wrapping_add(1);
        self.tables
            .push(Table::new(id, name, area, column_names, self.sheet));
        Ok(id)
    }

    /// Rename a table, enforcing name validity and per-sheet uniqueness.
    pub fn rename(&mut self, id: TableId, new_name: impl Into<String>) -> Result<(), TableError> {
        let new_name = new_name.into();
        let new_name = new_name.trim().to_string();
        validate_table_name(&new_name)?;

        if self
            .tables
            .iter()
            .any(|t| t.id() != id && t.name() == new_name)
        {
            return Err(TableError::DuplicateName);
        }

        let Some(table) = self.table_mut(id) else {
            return Err(TableError::TableNotFound);
        };
        table.rename(new_name);
        Ok(())
    }

    /// Move or resize a table's stored area.
    ///
    /// The new range must keep room for the header row plus at least one
    /// data row, and may not overlap any other table. The column list
    /// follows the new width: surplus names are dropped, missing ones get
    /// generated `Column{n}` defaults.
    pub fn resize(&mut self, id: TableId, new_range: RangeRef) -> Result<(), TableError> {
        let Some(index) = self.tables.iter().position(|t| t.id() == id) else {
            return Err(TableError::TableNotFound);
        };
        if new_range.height() < 2 {
            return Err(TableError::InvalidRange);
        }
        for table in &self.tables {
            if table.id() != id && table.range().overlaps_with(new_range) {
                return Err(TableError::OverlappingRange {
                    name: table.name().to_string(),
                });
            }
        }

        self.tables[index].set_range(new_range);
        Ok(())
    }

    /// Iterate over tables in insertion order.
    pub fn iter(&self) -> TablesIter<'_> {
        TablesIter {
            registry: self,
            front: 0,
            back: self.tables.len(),
        }
    }

    /// Iterate with mutable access to each table.
    ///
    /// Renaming a table through this iterator bypasses the registry's
    /// uniqueness check; see [`Table::rename`].
    pub fn iter_mut(&mut self) -> TablesIterMut<'_> {
        TablesIterMut(self.tables.iter_mut())
    }
}

impl<'a> IntoIterator for &'a TableRegistry {
    type Item = &'a Table;
    type IntoIter = TablesIter<'a>;

    fn into_iter(self) -> TablesIter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut TableRegistry {
    type Item = &'a mut Table;
    type IntoIter = TablesIterMut<'a>;

    fn into_iter(self) -> TablesIterMut<'a> {
        self.iter_mut()
    }
}

impl<'de> Deserialize<'de> for TableRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            #[serde(default)]
            sheet: SheetId,
            #[serde(default)]
            tables: Vec<Table>,
        }

        let helper = Helper::deserialize(deserializer)?;

        let next_table_id = helper
            .tables
            .iter()
            .map(|t| t.id())
            .max()
            .unwrap_or(0)
            .wrapping_add(1);

        Ok(TableRegistry {
            sheet: helper.sheet,
            tables: helper.tables,
            next_table_id,
        })
    }
}

/// Double-ended iterator over a registry's tables in insertion order.
///
/// The iterator is a pair of cursor positions into the registry's live
/// storage; each step resolves the current position at the time of the
/// call. The shared borrow it holds keeps the registry unchanged for its
/// whole lifetime, so the positions cannot go stale.
#[derive(Clone)]
pub struct TablesIter<'a> {
    registry: &'a TableRegistry,
    front: usize,
    back: usize,
}

impl<'a> Iterator for TablesIter<'a> {
    type Item = &'a Table;

    fn next(&mut self) -> Option<&'a Table> {
        if self.front == self.back {
            return None;
        }
        let table = &self.registry.tables[self.front];
        self.front += 1;
        Some(table)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for TablesIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.registry.tables[self.back])
    }
}

impl ExactSizeIterator for TablesIter<'_> {}

impl FusedIterator for TablesIter<'_> {}

/// Mutable counterpart of [`TablesIter`].
pub struct TablesIterMut<'a>(std::slice::IterMut<'a, Table>);

impl<'a> Iterator for TablesIterMut<'a> {
    type Item = &'a mut Table;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for TablesIterMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl ExactSizeIterator for TablesIterMut<'_> {}

impl FusedIterator for TablesIterMut<'_> {}
