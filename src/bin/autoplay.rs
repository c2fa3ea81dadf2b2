#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use blockfall::engine::{Command, Direction, Engine};
#[cfg(not(target_arch = "wasm32"))]
use blockfall::render::Frame;
#[cfg(not(target_arch = "wasm32"))]
use blockfall::session::Session;
#[cfg(not(target_arch = "wasm32"))]
use blockfall::settings::GameSettings;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use rand::rngs::StdRng;
#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Plays a headless game with random key presses and prints the final board.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
struct Opts {
    /// Gravity period in milliseconds
    #[arg(long, default_value_t = 20)]
    tick_ms: u32,
    /// Key presses sent between two gravity ticks
    #[arg(long, default_value_t = 3)]
    presses_per_tick: u32,
    /// Stop after this many tick periods even if the game is still running
    #[arg(long, default_value_t = 2_000)]
    max_rounds: u32,
    /// Seed for both the piece randomizer and the simulated player
    #[arg(long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let (engine, rounds) = play(&opts).await?;
    print!("{}", Frame::from_snapshot(&engine.snapshot()).to_text());
    println!(
        "{} after {} round(s)",
        if engine.is_game_over() { "game over" } else { "stopped" },
        rounds
    );
    Ok(())
}

/// Spreads the presses evenly over one tick period.
#[cfg(not(target_arch = "wasm32"))]
fn press_pause(period: Duration, presses_per_tick: u32) -> Duration {
    period / presses_per_tick.saturating_add(1)
}

#[cfg(not(target_arch = "wasm32"))]
fn random_command(player: &mut StdRng) -> Command {
    match player.gen_range(0..4) {
        0 => Command::Move(Direction::Left),
        1 => Command::Move(Direction::Right),
        2 => Command::Move(Direction::Down),
        _ => Command::Rotate,
    }
}

/// Runs until the game ends or `max_rounds` periods pass. Returns the final
/// engine and the number of rounds played.
#[cfg(not(target_arch = "wasm32"))]
async fn play(opts: &Opts) -> anyhow::Result<(Engine, u32)> {
    let settings = GameSettings {
        tick_interval_ms: opts.tick_ms.max(1),
        seed: opts.seed,
        ..GameSettings::default()
    };
    let period = Duration::from_millis(settings.tick_interval_ms as u64);
    let handle = Session::new(Engine::new(&settings), period).spawn();
    let mut player = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut rounds = 0;
    let pause = press_pause(period, opts.presses_per_tick);
    while rounds < opts.max_rounds && !handle.snapshot().game_over {
        for _ in 0..opts.presses_per_tick {
            handle.send(random_command(&mut player))?;
            tokio::time::sleep(pause).await;
        }
        tokio::time::sleep(pause).await;
        rounds += 1;
    }

    let engine = handle.shutdown().await?;
    Ok((engine, rounds))
}
