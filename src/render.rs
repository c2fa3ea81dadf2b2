use serde::Serialize;

use crate::board::{COLS, ROWS};
use crate::engine::Snapshot;
use crate::shape::Color;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i8,
    pub y: i8,
}

/// Board and falling piece composited into one grid, ready to paint.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Frame {
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` entries.
    pub cells: Vec<Option<Color>>,
    /// Visible cells of the falling piece.
    pub active: Vec<Point>,
    pub active_color: Option<Color>,
    pub game_over: bool,
}

impl Frame {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut cells: Vec<Option<Color>> =
            snapshot.board.rows().iter().flatten().copied().collect();

        // Nothing falls once the game is over.
        let piece = snapshot.active_piece.as_ref().filter(|_| !snapshot.game_over);
        let active: Vec<Point> = piece
            .map(|p| {
                p.cells()
                    .filter(|&(col, row)| {
                        (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col)
                    })
                    .map(|(col, row)| Point {
                        x: col as i8,
                        y: row as i8,
                    })
                    .collect()
            })
            .unwrap_or_default();
        if let Some(p) = piece {
            for point in &active {
                cells[point.y as usize * COLS + point.x as usize] = Some(p.color);
            }
        }

        Self {
            rows: ROWS,
            cols: COLS,
            cells,
            active,
            active_color: piece.map(|p| p.color),
            game_over: snapshot.game_over,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Color> {
        self.cells[row * self.cols + col]
    }

    /// Plain-text board: `.` for empty, the color initial otherwise, and a
    /// banner line once the game is over.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * (self.rows + 1));
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter().map(|cell| cell.map_or('.', Color::initial)));
            out.push('\n');
        }
        if self.game_over {
            out.push_str("GAME OVER\n");
        }
        out
    }
}
