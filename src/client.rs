use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::engine::{Command, Direction, Engine};
use crate::log;
use crate::render::Frame;
use crate::settings::GameSettings;

/// Browser-facing handle. The page calls `tick` from a `setInterval` of
/// `tickIntervalMs()` and forwards key presses; every call returns the frame
/// to paint.
#[wasm_bindgen]
pub struct GameClient {
    engine: Engine,
    settings: GameSettings,
}

impl GameClient {
    pub fn with_settings(settings: GameSettings) -> Self {
        Self {
            engine: Engine::new(&settings),
            settings,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Maps a `KeyboardEvent.key` name through the bindings and applies it.
    /// Returns whether the key is bound at all.
    pub fn press(&mut self, key: &str) -> bool {
        match self.settings.bindings.command_for_key(key) {
            Some(command) => {
                self.engine.apply(command);
                true
            }
            None => false,
        }
    }

    fn render(&self) -> Result<JsValue, JsValue> {
        to_value(&Frame::from_snapshot(&self.engine.snapshot())).map_err(|e| e.into())
    }

    fn apply(&mut self, command: Command) -> Result<JsValue, JsValue> {
        self.engine.apply(command);
        self.render()
    }
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<GameClient, JsValue> {
        let settings: GameSettings = if settings.is_undefined() || settings.is_null() {
            GameSettings::default()
        } else {
            from_value(settings).unwrap_or_default()
        };
        log(&format!(
            "GameClient ready: tick every {}ms, randomizer {:?}",
            settings.tick_interval_ms, settings.randomizer
        ));
        Ok(Self::with_settings(settings))
    }

    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.settings.tick_interval_ms
    }

    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Tick)
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Move(Direction::Left))
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Move(Direction::Right))
    }

    #[wasm_bindgen(js_name = moveDown)]
    pub fn move_down(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Move(Direction::Down))
    }

    #[wasm_bindgen(js_name = rotate)]
    pub fn rotate(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Rotate)
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.apply(Command::Reset)
    }

    /// Handles a `keydown` event, suppressing page scroll for bound keys.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, event: KeyboardEvent) -> Result<JsValue, JsValue> {
        if self.press(&event.key()) {
            event.prevent_default();
        }
        self.render()
    }

    #[wasm_bindgen(js_name = frame)]
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        self.render()
    }

    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.engine.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }
}
