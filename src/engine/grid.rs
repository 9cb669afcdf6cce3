//! Sparse pattern storage - which row, if any, sounds in each column.

use std::collections::HashMap;

/// Column-to-row associations for the placed marks.
///
/// At most one row per column; several columns may share a row. Backed by a
/// hash map because `lookup` runs once per tick on the audio update path.
#[derive(Debug, Default)]
pub struct PatternGrid {
    cells: HashMap<usize, usize>,
}

impl PatternGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a cell pick.
    ///
    /// Picking the occupied cell again clears the column; picking a different
    /// row in an occupied column moves the mark there; picking in an empty
    /// column places a new mark.
    pub fn edit(&mut self, column: usize, row: usize) {
        match self.cells.remove(&column) {
            Some(existing) if existing == row => {} // toggle off
            _ => {
                self.cells.insert(column, row);
            }
        }
    }

    /// Remove every mark.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// The row marked in `column`, if any.
    pub fn lookup(&self, column: usize) -> Option<usize> {
        self.cells.get(&column).copied()
    }

    /// Iterate over `(column, row)` marks in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(|(&column, &row)| (column, row))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
