//! Error types for the rule engine.

use thiserror::Error;

use crate::board::Coordinate;
use crate::types::PieceKey;

/// Failures raised while loading a layout or when an engine invariant breaks.
///
/// Illegal moves are not errors: `GameEngine::move_piece` reports them as
/// `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaflError {
    #[error("coordinate ({x}, {y}) is outside a {size}x{size} board")]
    CoordinateOutOfRange { x: i64, y: i64, size: u8 },

    #[error("unsupported board size {size}, only 11x11 boards are played")]
    UnsupportedBoardSize { size: u8 },

    #[error("king #{id} cannot be owned by the attacker")]
    AttackerKing { id: u32 },

    #[error("layout line {line} does not match `(x, y) -> {{owner}}{{type}}{{id}}`: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("layout line {line}: unknown owner {owner:?} (expected 1 or 2)")]
    UnknownOwner { line: usize, owner: char },

    #[error("layout line {line}: unknown piece type {kind:?} (expected p or k)")]
    UnknownPieceType { line: usize, kind: char },

    #[error("layout line {line}: square {square} is already occupied")]
    DuplicateSquare { line: usize, square: Coordinate },

    #[error("layout line {line}: piece {piece} is placed twice")]
    DuplicatePiece { line: usize, piece: PieceKey },

    #[error("layout must place exactly one king, found {found}")]
    KingCount { found: usize },

    #[error("king not found on the board")]
    KingMissing,

    #[error("tried to capture from empty square {square}")]
    CaptureFromEmptySquare { square: Coordinate },

    #[error("cannot undo the spawn square of piece {piece}")]
    SpawnUndo { piece: PieceKey },

    #[error("piece {piece} never stepped on {square}")]
    StepNotRecorded { piece: PieceKey, square: Coordinate },
}

pub type TaflResult<T> = Result<T, TaflError>;
