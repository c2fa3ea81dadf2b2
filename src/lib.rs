use wasm_bindgen::prelude::*;

pub mod board;
pub mod client;
pub mod engine;
pub mod randomizer;
pub mod render;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
pub mod settings;
pub mod shape;

pub use board::{Board, COLS, ROWS};
pub use client::GameClient;
pub use engine::{ActivePiece, Command, Direction, Engine, Phase, Snapshot, TickOutcome};
pub use render::Frame;
pub use settings::GameSettings;
pub use shape::{Color, Shape, Tetromino};

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log(msg: &str) {
    eprintln!("{msg}");
}
