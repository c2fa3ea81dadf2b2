use serde::{Deserialize, Serialize};

use crate::engine::{Command, Direction};
use crate::randomizer::RandomizerKind;

pub const TICK_INTERVAL_MS: u32 = 500;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub tick_interval_ms: u32,
    pub randomizer: RandomizerKind,
    pub seed: Option<u64>,
    /// End the game when a piece locks with cells above the visible board.
    pub lock_out: bool,
    pub bindings: ControlBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            randomizer: RandomizerKind::TrueRandom,
            seed: None,
            lock_out: true,
            bindings: ControlBindings::default(),
        }
    }
}

/// `KeyboardEvent.key` names for each control.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ControlBindings {
    pub move_left: String,
    pub move_right: String,
    pub soft_drop: String,
    pub rotate: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            move_left: "ArrowLeft".to_string(),
            move_right: "ArrowRight".to_string(),
            soft_drop: "ArrowDown".to_string(),
            rotate: "ArrowUp".to_string(),
        }
    }
}

impl ControlBindings {
    pub fn command_for_key(&self, key: &str) -> Option<Command> {
        if key == self.move_left {
            Some(Command::Move(Direction::Left))
        } else if key == self.move_right {
            Some(Command::Move(Direction::Right))
        } else if key == self.soft_drop {
            Some(Command::Move(Direction::Down))
        } else if key == self.rotate {
            Some(Command::Rotate)
        } else {
            None
        }
    }
}
