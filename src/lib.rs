use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod ledger;
pub mod piece;
pub mod report;
pub mod types;
pub mod wasm;

pub use board::{BoardGeometry, Coordinate};
pub use config::GameConfig;
pub use error::{TaflError, TaflResult};
pub use game::{GameEngine, GameMove};
pub use piece::{Piece, PieceKind};
pub use report::{GameReport, LogReporter, Reporter};
pub use types::{PieceKey, Player, Side};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
