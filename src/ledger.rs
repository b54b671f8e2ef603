use std::collections::{BTreeMap, HashMap};

use crate::board::Coordinate;
use crate::error::{TaflError, TaflResult};
use crate::types::PieceKey;

/// Per-square record of which pieces stood there and how often.
///
/// Keyed by value, so any `Coordinate` naming a square reaches the same
/// entry. A piece absent from a square's map never stepped there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLedger {
    squares: BTreeMap<Coordinate, HashMap<PieceKey, u32>>,
}

impl StepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more step of `piece` on `square`.
    pub fn step(&mut self, square: Coordinate, piece: PieceKey) {
        *self
            .squares
            .entry(square)
            .or_default()
            .entry(piece)
            .or_insert(0) += 1;
    }

    /// Removes one step of `piece` from `square`. Entries that reach zero are
    /// dropped, so a step followed by its undo leaves the ledger unchanged.
    pub fn undo_step(&mut self, square: Coordinate, piece: PieceKey) -> TaflResult<()> {
        let missing = TaflError::StepNotRecorded { piece, square };
        let steppers = self.squares.get_mut(&square).ok_or(missing.clone())?;
        let count = steppers.get_mut(&piece).ok_or(missing)?;

        if *count > 1 {
            *count -= 1;
            return Ok(());
        }
        steppers.remove(&piece);
        if steppers.is_empty() {
            self.squares.remove(&square);
        }
        Ok(())
    }

    /// How many times `piece` stepped on `square`.
    pub fn steps(&self, square: Coordinate, piece: PieceKey) -> u32 {
        self.squares
            .get(&square)
            .and_then(|steppers| steppers.get(&piece))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pieces that ever stepped on `square`.
    pub fn distinct_steppers(&self, square: Coordinate) -> usize {
        self.squares.get(&square).map_or(0, HashMap::len)
    }

    /// Every square with at least one recorded step, in `(x, y)` order.
    pub fn squares(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.squares.keys().copied()
    }

    pub fn clear(&mut self) {
        self.squares.clear();
    }
}
