use std::fmt;

use serde::Serialize;

use crate::board::Coordinate;

pub const CELL_EMPTY: u8 = 0;
pub const CELL_DEFENDER: u8 = 1;
pub const CELL_ATTACKER: u8 = 2;
pub const CELL_KING: u8 = 3;

/// One of the two fixed sides. The Defender owns the king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Defender,
    Attacker,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Defender => Self::Attacker,
            Self::Attacker => Self::Defender,
        }
    }

    /// Player one is the Defender.
    pub fn is_player_one(self) -> bool {
        self == Self::Defender
    }

    /// Owner digit used by the layout format: 1 = Defender, 2 = Attacker.
    pub fn number(self) -> u8 {
        match self {
            Self::Defender => 1,
            Self::Attacker => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Defender),
            2 => Some(Self::Attacker),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Defender => 0,
            Self::Attacker => 1,
        }
    }

    pub(crate) fn letter(self) -> char {
        match self {
            Self::Defender => 'D',
            Self::Attacker => 'A',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defender => f.write_str("defender"),
            Self::Attacker => f.write_str("attacker"),
        }
    }
}

/// A side together with its win tally. Only the engine changes the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Player {
    side: Side,
    wins: u32,
}

impl Player {
    pub(crate) fn new(side: Side) -> Self {
        Self { side, wins: 0 }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_player_one(&self) -> bool {
        self.side.is_player_one()
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub(crate) fn add_win(&mut self) {
        self.wins += 1;
    }

    pub(crate) fn remove_win(&mut self) {
        self.wins = self.wins.saturating_sub(1);
    }
}

/// Piece identity: owner plus the id given in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceKey {
    pub owner: Side,
    pub id: u32,
}

impl PieceKey {
    pub fn new(owner: Side, id: u32) -> Self {
        Self { owner, id }
    }
}

impl fmt::Display for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner.number(), self.id)
    }
}

/// Board view handed to hosts (the WASM façade serializes it as-is).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub size: u8,
    /// Contract:
    /// - Row-major, `index = y * size + x`.
    /// - 0 = empty, 1 = defender pawn, 2 = attacker pawn, 3 = king.
    pub board: Vec<u8>,
    /// 1 = Defender, 2 = Attacker.
    pub current_player: u8,
    pub defender_wins: u32,
    pub attacker_wins: u32,
    pub is_game_over: bool,
    /// 1 = Defender, 2 = Attacker, absent while undecided.
    pub winner: Option<u8>,
    pub move_count: usize,
    /// Squares emptied by the most recent move; empty before the first move.
    pub captured: Vec<Coordinate>,
}
