use serde::{Deserialize, Serialize};

/// Color tag carried by a piece and stamped into the board when it locks.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Purple,
    Yellow,
    Orange,
    Blue,
    Green,
    Red,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
        }
    }

    /// Single character used by the text renderer.
    pub fn initial(self) -> char {
        match self {
            Color::Cyan => 'c',
            Color::Purple => 'p',
            Color::Yellow => 'y',
            Color::Orange => 'o',
            Color::Blue => 'b',
            Color::Green => 'g',
            Color::Red => 'r',
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    T,
    O,
    L,
    J,
    S,
    Z,
}

impl Tetromino {
    pub fn all() -> [Tetromino; 7] {
        [
            Tetromino::I,
            Tetromino::T,
            Tetromino::O,
            Tetromino::L,
            Tetromino::J,
            Tetromino::S,
            Tetromino::Z,
        ]
    }

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => Color::Cyan,
            Tetromino::T => Color::Purple,
            Tetromino::O => Color::Yellow,
            Tetromino::L => Color::Orange,
            Tetromino::J => Color::Blue,
            Tetromino::S => Color::Green,
            Tetromino::Z => Color::Red,
        }
    }

    /// Spawn orientation of the piece.
    pub fn shape(self) -> Shape {
        match self {
            Tetromino::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            Tetromino::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            Tetromino::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            Tetromino::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
            Tetromino::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            Tetromino::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            Tetromino::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        }
    }
}

/// Occupancy matrix of a piece, rows top to bottom, `1` for a filled cell.
/// Always rectangular.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<u8>>,
}

impl Shape {
    /// Short rows are padded with empty cells up to the widest row.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let cells = rows
            .iter()
            .map(|row| {
                let mut line = row.to_vec();
                line.resize(width, 0);
                line
            })
            .collect();
        Self { cells }
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.cells
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Offsets `(col, row)` of every filled cell relative to the top-left corner.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 0)
                .map(move |(col, _)| (col as i32, row as i32))
        })
    }

    /// Clockwise quarter turn. An `R x C` matrix becomes `C x R` with
    /// `out[i][j] = in[R - 1 - j][i]`.
    pub fn rotate(&self) -> Shape {
        let height = self.height();
        let cells = (0..self.width())
            .map(|i| (0..height).map(|j| self.cells[height - 1 - j][i]).collect())
            .collect();
        Shape { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_matches_reference_colors() {
        let colors: Vec<&str> = Tetromino::all().iter().map(|p| p.color().as_str()).collect();
        assert_eq!(
            colors,
            vec!["cyan", "purple", "yellow", "orange", "blue", "green", "red"]
        );
    }

    #[test]
    fn every_piece_has_four_cells() {
        for piece in Tetromino::all() {
            assert_eq!(piece.shape().occupied().count(), 4, "{piece:?}");
        }
    }

    #[test]
    fn ragged_rows_are_padded_before_rotating() {
        let shape = Shape::from_rows(&[&[1], &[1, 1, 1], &[]]);
        assert_eq!((shape.width(), shape.height()), (3, 3));
        assert_eq!(shape.occupied().count(), 4);

        let turned = shape.rotate();
        assert_eq!(
            turned,
            Shape::from_rows(&[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]])
        );
        assert_eq!(turned.rotate().rotate().rotate(), shape);
    }

    #[test]
    fn rotate_t_clockwise() {
        let rotated = Tetromino::T.shape().rotate();
        assert_eq!(
            rotated,
            Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]])
        );
    }

    #[test]
    fn rotate_line_piece_is_vertical() {
        let rotated = Tetromino::I.shape().rotate();
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 4);
        assert_eq!(rotated.rotate(), Tetromino::I.shape());
    }

    #[test]
    fn rotation_swaps_dimensions_and_cycles_after_four_turns() {
        for piece in [
            Tetromino::L,
            Tetromino::J,
            Tetromino::S,
            Tetromino::Z,
            Tetromino::T,
            Tetromino::I,
        ] {
            let shape = piece.shape();
            let once = shape.rotate();
            assert_eq!(once.height(), shape.width(), "{piece:?}");
            assert_eq!(once.width(), shape.height(), "{piece:?}");
            assert_ne!(once, shape, "{piece:?}");
            assert_eq!(once.rotate().rotate().rotate(), shape, "{piece:?}");
        }
    }

    #[test]
    fn color_serializes_as_lowercase_tag() {
        assert_eq!(serde_json::to_string(&Color::Yellow).unwrap(), "\"yellow\"");
    }
}
