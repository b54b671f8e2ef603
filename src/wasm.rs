use wasm_bindgen::prelude::*;

use crate::board::Coordinate;
use crate::config::GameConfig;
use crate::error::TaflError;
use crate::game::GameEngine;

/// JS handle to one game on the standard board.
#[wasm_bindgen]
pub struct TaflGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl TaflGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<TaflGame, JsValue> {
        let engine = GameEngine::new(GameConfig::default()).map_err(to_js_error)?;
        Ok(Self { engine })
    }

    /// Off-board coordinates are rejected like any other illegal move.
    pub fn move_piece(&mut self, src_x: i32, src_y: i32, dst_x: i32, dst_y: i32) -> Result<bool, JsValue> {
        let (Ok(src), Ok(dst)) = (Coordinate::new(src_x, src_y), Coordinate::new(dst_x, dst_y)) else {
            return Ok(false);
        };
        self.engine.move_piece(src, dst).map_err(to_js_error)
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.engine.undo_last_move().map_err(to_js_error)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.engine.reset().map_err(to_js_error)
    }

    pub fn is_game_finished(&self) -> Result<bool, JsValue> {
        self.engine.is_game_finished().map_err(to_js_error)
    }

    pub fn is_second_player_turn(&self) -> bool {
        self.engine.is_second_player_turn()
    }

    pub fn board_size(&self) -> u8 {
        self.engine.board_size()
    }

    /// Current `BoardSnapshot`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.engine.snapshot().map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// `GameReport` for the decided winner, or `null` while play goes on.
    pub fn report(&self) -> Result<JsValue, JsValue> {
        match self.engine.winner().map_err(to_js_error)? {
            Some(winner) => Ok(serde_wasm_bindgen::to_value(&self.engine.build_report(winner))?),
            None => Ok(JsValue::NULL),
        }
    }
}

fn to_js_error(err: TaflError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
