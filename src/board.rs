use serde::{Deserialize, Serialize};

use crate::shape::{Color, Shape};

pub const ROWS: usize = 20;
pub const COLS: usize = 10;

pub type Cell = Option<Color>;

/// Settled cells, row 0 at the top. Every operation that changes the grid
/// returns a new board so earlier snapshots stay readable.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }

    pub fn from_cells(cells: [[Cell; COLS]; ROWS]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// Whether `shape` anchored at `(x, y)` fits: inside the side walls, above
    /// the floor and clear of settled cells. Rows above the board always fit.
    pub fn is_valid_position(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.occupied().all(|(col, row)| {
            let bx = x + col;
            let by = y + row;
            if bx < 0 || bx >= COLS as i32 || by >= ROWS as i32 {
                return false;
            }
            by < 0 || self.cells[by as usize][bx as usize].is_none()
        })
    }

    /// Stamps `color` into every covered cell on the board. Cells above the
    /// top row are dropped.
    pub fn merge_piece(&self, shape: &Shape, x: i32, y: i32, color: Color) -> Board {
        let mut merged = self.clone();
        for (col, row) in shape.occupied() {
            let bx = x + col;
            let by = y + row;
            if by >= 0 && (0..COLS as i32).contains(&bx) && by < ROWS as i32 {
                merged.cells[by as usize][bx as usize] = Some(color);
            }
        }
        merged
    }

    pub fn full_rows(&self) -> usize {
        self.cells
            .iter()
            .filter(|row| row.iter().all(Option::is_some))
            .count()
    }

    /// Drops every full row and pads the top with empty rows.
    pub fn clear_lines(&self) -> Board {
        let kept: Vec<[Cell; COLS]> = self
            .cells
            .iter()
            .filter(|row| row.iter().any(Option::is_none))
            .copied()
            .collect();
        let mut cleared = Board::new();
        let offset = ROWS - kept.len();
        for (i, row) in kept.into_iter().enumerate() {
            cleared.cells[offset + i] = row;
        }
        cleared
    }
}
