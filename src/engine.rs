use serde::{Deserialize, Serialize};

use crate::board::{Board, COLS};
use crate::log;
use crate::randomizer::{Randomizer, randomizer_from_kind};
use crate::settings::GameSettings;
use crate::shape::{Color, Shape, Tetromino};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Everything that can change engine state, applied one at a time.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Command {
    Tick,
    Move(Direction),
    Rotate,
    Reset,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Phase {
    Falling,
    GameOver,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Fell,
    Locked { lines_cleared: usize },
    ToppedOut,
    Ignored,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct ActivePiece {
    pub piece: Tetromino,
    pub shape: Shape,
    pub color: Color,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Spawn orientation centered over the board, fully above the top row.
    pub fn spawn(piece: Tetromino) -> Self {
        let shape = piece.shape();
        let x = (COLS as i32 - shape.width() as i32).div_euclid(2);
        let y = -(shape.height() as i32);
        Self {
            piece,
            color: piece.color(),
            shape,
            x,
            y,
        }
    }

    pub fn at(piece: Tetromino, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::spawn(piece)
        }
    }

    /// Absolute `(col, row)` of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(|(col, row)| (self.x + col, self.y + row))
    }

    fn fits(&self, board: &Board) -> bool {
        board.is_valid_position(&self.shape, self.x, self.y)
    }
}

/// Read-only view of the engine handed to renderers.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub active_piece: Option<ActivePiece>,
    pub game_over: bool,
}

pub struct Engine {
    board: Board,
    active: Option<ActivePiece>,
    game_over: bool,
    lock_out: bool,
    randomizer: Box<dyn Randomizer>,
}

impl Engine {
    pub fn new(settings: &GameSettings) -> Self {
        let randomizer = randomizer_from_kind(settings.randomizer.clone(), settings.seed);
        Self::with_randomizer(randomizer, settings.lock_out)
    }

    pub fn with_randomizer(mut randomizer: Box<dyn Randomizer>, lock_out: bool) -> Self {
        let active = ActivePiece::spawn(randomizer.next());
        Self::from_parts(Board::new(), active, randomizer, lock_out)
    }

    /// Starts from an arbitrary board and falling piece.
    pub fn from_parts(
        board: Board,
        active: ActivePiece,
        randomizer: Box<dyn Randomizer>,
        lock_out: bool,
    ) -> Self {
        Self {
            board,
            active: Some(active),
            game_over: false,
            lock_out,
            randomizer,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::Falling
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active_piece: self.active.clone(),
            game_over: self.game_over,
        }
    }

    /// Applies one command. Returns whether any state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Tick => self.tick() != TickOutcome::Ignored,
            Command::Move(direction) => self.move_piece(direction),
            Command::Rotate => self.rotate(),
            Command::Reset => {
                self.reset();
                true
            }
        }
    }

    /// One step of gravity: fall a row, or lock and spawn the next piece.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Ignored;
        }
        let Some(active) = self.active.as_mut() else {
            return TickOutcome::Ignored;
        };
        if self
            .board
            .is_valid_position(&active.shape, active.x, active.y + 1)
        {
            active.y += 1;
            return TickOutcome::Fell;
        }
        self.lock()
    }

    fn lock(&mut self) -> TickOutcome {
        let Some(active) = self.active.take() else {
            return TickOutcome::Ignored;
        };
        let merged = self
            .board
            .merge_piece(&active.shape, active.x, active.y, active.color);
        let lines_cleared = merged.full_rows();
        self.board = merged.clear_lines();
        if lines_cleared > 0 {
            log(&format!("cleared {lines_cleared} line(s)"));
        }

        if self.lock_out && active.cells().any(|(_, row)| row < 0) {
            self.top_out(&format!("Lock out: {:?} locked above the board", active.piece));
            return TickOutcome::ToppedOut;
        }

        let next = ActivePiece::spawn(self.randomizer.next());
        if !next.fits(&self.board) {
            self.top_out(&format!("Top out on spawn: {:?}", next.piece));
            return TickOutcome::ToppedOut;
        }
        self.active = Some(next);
        TickOutcome::Locked { lines_cleared }
    }

    fn top_out(&mut self, reason: &str) {
        self.game_over = true;
        self.active = None;
        log(reason);
    }

    /// Shifts the falling piece one cell. Moving down never locks.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.offset();
        self.try_replace(|active| ActivePiece {
            x: active.x + dx,
            y: active.y + dy,
            ..active.clone()
        })
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(Direction::Right)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(Direction::Down)
    }

    /// Clockwise turn in place, no kicks.
    pub fn rotate(&mut self) -> bool {
        self.try_replace(|active| ActivePiece {
            shape: active.shape.rotate(),
            ..active.clone()
        })
    }

    fn try_replace(&mut self, candidate: impl FnOnce(&ActivePiece) -> ActivePiece) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        let test = candidate(active);
        if !test.fits(&self.board) {
            return false;
        }
        self.active = Some(test);
        true
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.game_over = false;
        self.active = Some(ActivePiece::spawn(self.randomizer.next()));
        log("Game reset");
    }
}
