use std::fmt;

use crate::cells::CellIndex;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Every cell index that existed when the iterator was made, over cells first in row-major order.
///
/// The iterator does not borrow the grid, so cells can be linked or removed while iterating.
#[derive(Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(cells_count: usize) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = CellIndex;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let cell = CellIndex(self.current_cell_number);
            self.current_cell_number += 1;
            Some(cell)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// The over cells of a grid, one row at a time. Under cells are never part of a row.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: RowIndex,
    rows_size: RowsCount,
    cols_size: ColumnsCount,
}

impl RowIter {
    pub(crate) fn new(rows_size: RowsCount, cols_size: ColumnsCount) -> RowIter {
        RowIter {
            current_row: RowIndex(0),
            rows_size,
            cols_size,
        }
    }
}

impl ExactSizeIterator for RowIter {} // default impl using size_hint()
impl Iterator for RowIter {
    type Item = Vec<CellIndex>;
    fn next(&mut self) -> Option<Self::Item> {
        let RowIndex(row) = self.current_row;
        let RowsCount(count) = self.rows_size;
        if row < count {
            let ColumnsCount(length) = self.cols_size;
            let cells = (0..length)
                .map(|i: usize| cell_at(RowIndex(row), ColumnIndex(i), self.cols_size))
                .collect();
            self.current_row = RowIndex(row + 1);
            Some(cells)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.rows_size.0 - self.current_row.0;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[inline]
fn cell_at(row: RowIndex, column: ColumnIndex, cols_size: ColumnsCount) -> CellIndex {
    CellIndex(row.0 * cols_size.0 + column.0)
}
