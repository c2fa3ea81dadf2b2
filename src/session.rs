use anyhow::{Context, anyhow};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use crate::engine::{Command, Engine, Snapshot};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Drives one engine from a tick timer and a command queue. Both sources are
/// consumed by a single task, so every event is applied in arrival order and
/// readers only ever observe published snapshots.
pub struct Session {
    engine: Engine,
    period: Duration,
}

pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<Engine>,
}

impl Session {
    /// `period` is clamped to at least one millisecond.
    pub fn new(engine: Engine, period: Duration) -> Self {
        Self {
            engine,
            period: period.max(MIN_PERIOD),
        }
    }

    pub fn spawn(self) -> SessionHandle {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(self.engine.snapshot());
        let task = tokio::spawn(self.run(command_rx, snapshot_tx));
        SessionHandle {
            commands,
            snapshots,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        snapshots: watch::Sender<Snapshot>,
    ) -> Engine {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            let command = tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
                _ = ticker.tick(), if !self.engine.is_game_over() => Command::Tick,
            };
            self.engine.apply(command);
            if command == Command::Reset {
                // A fresh piece gets a full period before its first fall.
                ticker.reset();
            }
            snapshots.send_replace(self.engine.snapshot());
        }
        self.engine
    }
}

impl SessionHandle {
    pub fn send(&self, command: Command) -> anyhow::Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("session has ended"))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stops accepting commands, lets the queue drain and hands back the engine.
    pub async fn shutdown(self) -> anyhow::Result<Engine> {
        let SessionHandle { commands, task, .. } = self;
        drop(commands);
        task.await.context("session task failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, ROWS};
    use crate::engine::{ActivePiece, Direction};
    use crate::randomizer::{RandomizerKind, randomizer_from_kind};
    use crate::shape::{Color, Tetromino};

    const PERIOD: Duration = Duration::from_millis(500);

    fn engine(board: Board, active: ActivePiece) -> Engine {
        let randomizer = randomizer_from_kind(
            RandomizerKind::SinglePiece {
                piece: Tetromino::O,
            },
            None,
        );
        Engine::from_parts(board, active, randomizer, true)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_on_the_configured_period() {
        let start = Instant::now();
        let handle = Session::new(engine(Board::new(), ActivePiece::at(Tetromino::O, 4, 0)), PERIOD)
            .spawn();
        let mut snapshots = handle.subscribe();

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().active_piece.as_ref().unwrap().y, 1);
        assert!(start.elapsed() >= PERIOD);

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().active_piece.as_ref().unwrap().y, 2);
        assert!(start.elapsed() >= PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn commands_apply_in_arrival_order() {
        let start = ActivePiece::at(Tetromino::I, 3, 5);
        let handle = Session::new(engine(Board::new(), start), PERIOD).spawn();
        handle.send(Command::Move(Direction::Left)).unwrap();
        handle.send(Command::Move(Direction::Left)).unwrap();
        handle.send(Command::Rotate).unwrap();
        handle.send(Command::Move(Direction::Right)).unwrap();

        let engine = handle.shutdown().await.unwrap();
        let active = engine.active_piece().unwrap();
        assert_eq!((active.x, active.y), (2, 5));
        assert_eq!(active.shape.height(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn game_over_stops_gravity_until_reset() {
        let mut board = Board::new();
        for row in 0..ROWS {
            for col in 3..=6 {
                board.set(row, col, Some(Color::Red));
            }
        }
        let handle = Session::new(engine(board, ActivePiece::spawn(Tetromino::O)), PERIOD).spawn();
        let mut snapshots = handle.subscribe();

        snapshots.changed().await.unwrap();
        assert!(snapshots.borrow_and_update().game_over);

        time::sleep(PERIOD * 10).await;
        assert!(!snapshots.has_changed().unwrap());

        handle.send(Command::Reset).unwrap();
        snapshots.changed().await.unwrap();
        let snapshot = snapshots.borrow_and_update().clone();
        assert!(!snapshot.game_over);
        assert!(snapshot.board.is_empty());
        assert_eq!(handle.snapshot(), snapshot);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_the_tick_cadence() {
        let mut board = Board::new();
        for row in 0..ROWS {
            for col in 3..=6 {
                board.set(row, col, Some(Color::Red));
            }
        }
        let handle = Session::new(engine(board, ActivePiece::spawn(Tetromino::O)), PERIOD).spawn();
        let mut snapshots = handle.subscribe();
        snapshots.changed().await.unwrap();
        assert!(snapshots.borrow_and_update().game_over);
        time::sleep(PERIOD * 10).await;

        handle.send(Command::Reset).unwrap();
        snapshots.changed().await.unwrap();
        let reset_at = Instant::now();
        let spawned = snapshots.borrow_and_update().active_piece.clone().unwrap();
        assert_eq!(spawned.y, -(spawned.shape.height() as i32));

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().active_piece.as_ref().unwrap().y, spawned.y + 1);
        assert_eq!(reset_at.elapsed(), PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let handle = Session::new(
            engine(Board::new(), ActivePiece::at(Tetromino::O, 4, 0)),
            Duration::ZERO,
        )
        .spawn();
        let mut snapshots = handle.subscribe();

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().active_piece.as_ref().unwrap().y, 1);
        handle.send(Command::Move(Direction::Left)).unwrap();

        let engine = handle.shutdown().await.unwrap();
        assert!(!engine.is_game_over());
    }

    #[tokio::test(start_paused = true)]
    async fn send_fails_once_the_session_is_gone() {
        let mut handle =
            Session::new(engine(Board::new(), ActivePiece::spawn(Tetromino::O)), PERIOD).spawn();
        handle.task.abort();
        assert!(matches!((&mut handle.task).await, Err(e) if e.is_cancelled()));
        assert!(handle.send(Command::Tick).is_err());
    }
}
