use std::fmt;

use serde::Serialize;

use crate::board::Coordinate;
use crate::error::{TaflError, TaflResult};
use crate::types::{PieceKey, Side};

/// Variant-specific data. Pawns count the captures they made; the king
/// neither captures nor is captured by flanking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PieceKind {
    Pawn { captures: u32 },
    King,
}

/// A piece and everything it did this game.
///
/// `history` starts with the spawn square and grows by one entry per move;
/// consecutive entries always share a row or column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    owner: Side,
    id: u32,
    kind: PieceKind,
    history: Vec<Coordinate>,
}

impl Piece {
    pub fn pawn(owner: Side, id: u32, spawn: Coordinate) -> Self {
        Self {
            owner,
            id,
            kind: PieceKind::Pawn { captures: 0 },
            history: vec![spawn],
        }
    }

    /// Kings belong to the Defender; anything else is rejected.
    pub fn king(owner: Side, id: u32, spawn: Coordinate) -> TaflResult<Self> {
        if owner != Side::Defender {
            return Err(TaflError::AttackerKing { id });
        }
        Ok(Self {
            owner,
            id,
            kind: PieceKind::King,
            history: vec![spawn],
        })
    }

    pub fn key(&self) -> PieceKey {
        PieceKey::new(self.owner, self.id)
    }

    pub fn owner(&self) -> Side {
        self.owner
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    pub fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn { .. })
    }

    /// Whether this piece can flank (as mover or as the assisting piece).
    pub fn can_capture(&self) -> bool {
        match self.kind {
            PieceKind::Pawn { .. } => true,
            PieceKind::King => false,
        }
    }

    /// Whether flanking removes this piece. The king only loses by encirclement.
    pub fn is_capturable(&self) -> bool {
        match self.kind {
            PieceKind::Pawn { .. } => true,
            PieceKind::King => false,
        }
    }

    /// Captures made so far, `None` for the king.
    pub fn captures(&self) -> Option<u32> {
        match self.kind {
            PieceKind::Pawn { captures } => Some(captures),
            PieceKind::King => None,
        }
    }

    pub fn history(&self) -> &[Coordinate] {
        &self.history
    }

    pub fn spawn(&self) -> Coordinate {
        self.history[0]
    }

    /// Current square, or the square it was captured on.
    pub fn position(&self) -> Coordinate {
        self.history[self.history.len() - 1]
    }

    /// Moves made, not counting the spawn entry.
    pub fn steps(&self) -> usize {
        self.history.len() - 1
    }

    /// Squares travelled over the whole history.
    pub fn total_distance(&self) -> u32 {
        self.history
            .windows(2)
            .filter_map(|pair| pair[0].straight_distance(pair[1]))
            .sum()
    }

    /// `K{id}` for the king, `D{id}`/`A{id}` for pawns.
    pub fn label(&self) -> String {
        match self.kind {
            PieceKind::King => format!("K{}", self.id),
            PieceKind::Pawn { .. } => format!("{}{}", self.owner.letter(), self.id),
        }
    }

    pub(crate) fn push_step(&mut self, dst: Coordinate) {
        self.history.push(dst);
    }

    /// Drops the last move. The spawn entry is never removed.
    pub(crate) fn pop_step(&mut self) -> TaflResult<Coordinate> {
        if self.history.len() <= 1 {
            return Err(TaflError::SpawnUndo { piece: self.key() });
        }
        self.history
            .pop()
            .ok_or(TaflError::SpawnUndo { piece: self.key() })
    }

    pub(crate) fn add_captures(&mut self, count: u32) {
        if let PieceKind::Pawn { captures } = &mut self.kind {
            *captures += count;
        }
    }

    pub(crate) fn undo_captures(&mut self, count: u32) {
        if let PieceKind::Pawn { captures } = &mut self.kind {
            *captures = captures.saturating_sub(count);
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn attacker_king_is_rejected() {
        assert_eq!(
            Piece::king(Side::Attacker, 3, c(5, 5)),
            Err(TaflError::AttackerKing { id: 3 })
        );
        assert!(Piece::king(Side::Defender, 7, c(5, 5)).unwrap().is_king());
    }

    #[test]
    fn history_tracks_steps_and_distance() {
        let mut pawn = Piece::pawn(Side::Attacker, 6, c(5, 1));
        pawn.push_step(c(5, 4));
        pawn.push_step(c(2, 4));

        assert_eq!(pawn.steps(), 2);
        assert_eq!(pawn.total_distance(), 6);
        assert_eq!(pawn.position(), c(2, 4));
        assert_eq!(pawn.spawn(), c(5, 1));
    }

    #[test]
    fn spawn_entry_cannot_be_popped() {
        let mut pawn = Piece::pawn(Side::Defender, 1, c(5, 3));
        pawn.push_step(c(5, 2));

        assert_eq!(pawn.pop_step(), Ok(c(5, 2)));
        assert_eq!(
            pawn.pop_step(),
            Err(TaflError::SpawnUndo {
                piece: PieceKey::new(Side::Defender, 1)
            })
        );
        assert_eq!(pawn.history(), &[c(5, 3)]);
    }

    #[test]
    fn only_pawns_count_captures() {
        let mut pawn = Piece::pawn(Side::Attacker, 2, c(0, 4));
        let mut king = Piece::king(Side::Defender, 7, c(5, 5)).unwrap();

        pawn.add_captures(2);
        king.add_captures(2);
        pawn.undo_captures(1);

        assert_eq!(pawn.captures(), Some(1));
        assert_eq!(king.captures(), None);
    }

    #[test]
    fn labels_follow_owner_and_kind() {
        assert_eq!(Piece::pawn(Side::Attacker, 12, c(1, 5)).label(), "A12");
        assert_eq!(Piece::pawn(Side::Defender, 3, c(5, 4)).label(), "D3");
        assert_eq!(
            Piece::king(Side::Defender, 7, c(5, 5)).unwrap().to_string(),
            "K7"
        );
    }
}
