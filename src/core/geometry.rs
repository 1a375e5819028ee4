use crate::domain::model::Position;
use serde::{Deserialize, Serialize};

/// Rows x columns decomposition of a plate, defining the mapping between
/// linear well positions and 2-D coordinates plus the traversal orders the
/// pipetting worksheets use.
///
/// Linear positions are row-major: A1 = 0, A2 = 1, ..., B1 = columns, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateShape {
    rows: usize,
    columns: usize,
}

impl PlateShape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Standard 96-well shape, 8 rows by 12 columns.
    pub fn standard_96() -> Self {
        Self::new(8, 12)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn well_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn matches_size(&self, size: usize) -> bool {
        self.well_count() == size
    }

    pub fn position(&self, row: usize, column: usize) -> Position {
        row * self.columns + column
    }

    /// `(row, column)` of a linear position.
    pub fn coordinate(&self, position: Position) -> (usize, usize) {
        (position / self.columns, position % self.columns)
    }

    /// "A1"-style label of a linear position (row letter, 1-based column).
    pub fn well_label(&self, position: Position) -> String {
        let (row, column) = self.coordinate(position);
        let letter = (b'A' + (row % 26) as u8) as char;
        format!("{}{}", letter, column + 1)
    }

    /// Identity order: A1, A2, ..., B1, B2, ...
    pub fn row_major_order(&self) -> Vec<Position> {
        (0..self.well_count()).collect()
    }

    /// Down each column, left to right: A1, B1, ..., A2, B2, ...
    pub fn column_major_order(&self) -> Vec<Position> {
        let mut order = Vec::with_capacity(self.well_count());
        for column in 0..self.columns {
            for row in 0..self.rows {
                order.push(self.position(row, column));
            }
        }
        order
    }

    /// Columns taken in adjacent pairs; within a pair each row emits the left
    /// then the right column before descending, the order an 8-channel head
    /// spanning two columns visits wells: A1, A2, B1, B2, ..., then A3, A4, ...
    /// An odd trailing column is walked alone.
    pub fn interleaved_column_order(&self) -> Vec<Position> {
        let mut order = Vec::with_capacity(self.well_count());
        let mut column = 0;
        while column < self.columns {
            let pair_width = if column + 1 < self.columns { 2 } else { 1 };
            for row in 0..self.rows {
                for offset in 0..pair_width {
                    order.push(self.position(row, column + offset));
                }
            }
            column += pair_width;
        }
        order
    }
}
