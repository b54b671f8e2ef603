//! End-of-game statistics.
//!
//! A [`GameReport`] holds four independently sorted and filtered views of the
//! pieces and squares of a finished game. The engine builds one when a game
//! is decided and hands it to its [`Reporter`].

use std::cmp::Ordering;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::board::Coordinate;
use crate::piece::Piece;
use crate::types::{PieceKey, Side};

const SECTION_BREAK_WIDTH: usize = 75;

/// Receives the report of every decided game.
pub trait Reporter: Send + Sync {
    fn report(&self, report: &GameReport);
}

/// Writes each report line through `log` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, report: &GameReport) {
        for line in report.to_string().lines() {
            info!(target: "tafl::report", "{line}");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry<K> {
    pub subject: K,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub winner: Side,
    /// Pieces that moved: winner's first, then fewer steps, then lower id.
    pub moves: Vec<ReportEntry<PieceKey>>,
    /// Pawns that captured: more captures, then lower id, then winner's first.
    pub captures: Vec<ReportEntry<PieceKey>>,
    /// Pieces that travelled: longer distance, then lower id, then winner's first.
    pub distances: Vec<ReportEntry<PieceKey>>,
    /// Squares shared by two or more pieces: more pieces, then lower x, then lower y.
    pub squares: Vec<ReportEntry<Coordinate>>,
}

impl GameReport {
    /// `squares` pairs each known square with its number of distinct steppers.
    pub fn build(winner: Side, pieces: &[&Piece], squares: &[(Coordinate, usize)]) -> Self {
        let mut moved: Vec<&Piece> = pieces.iter().copied().filter(|p| p.steps() > 0).collect();
        moved.sort_by(|a, b| by_move_count(winner, a, b));

        let mut capturers: Vec<&Piece> = pieces
            .iter()
            .copied()
            .filter(|p| p.captures().is_some_and(|n| n > 0))
            .collect();
        capturers.sort_by(|a, b| by_captures(winner, a, b));

        let mut travelled: Vec<&Piece> = pieces
            .iter()
            .copied()
            .filter(|p| p.total_distance() > 0)
            .collect();
        travelled.sort_by(|a, b| by_distance(winner, a, b));

        let mut shared: Vec<(Coordinate, usize)> =
            squares.iter().copied().filter(|&(_, n)| n >= 2).collect();
        shared.sort_by(by_steppers);

        Self {
            winner,
            moves: moved.into_iter().map(history_entry).collect(),
            captures: capturers
                .into_iter()
                .map(|p| ReportEntry {
                    subject: p.key(),
                    text: format!("{}: {} kills", p.label(), p.captures().unwrap_or(0)),
                })
                .collect(),
            distances: travelled
                .into_iter()
                .map(|p| ReportEntry {
                    subject: p.key(),
                    text: format!("{}: {} squares", p.label(), p.total_distance()),
                })
                .collect(),
            squares: shared
                .into_iter()
                .map(|(square, steppers)| ReportEntry {
                    subject: square,
                    text: format!("{square}{steppers} pieces"),
                })
                .collect(),
        }
    }
}

impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section_break = "*".repeat(SECTION_BREAK_WIDTH);
        let sections = [
            texts(&self.moves),
            texts(&self.captures),
            texts(&self.distances),
            texts(&self.squares),
        ];
        for section in sections {
            for text in section {
                writeln!(f, "{text}")?;
            }
            writeln!(f, "{section_break}")?;
        }
        Ok(())
    }
}

fn texts<K>(entries: &[ReportEntry<K>]) -> Vec<&str> {
    entries.iter().map(|entry| entry.text.as_str()).collect()
}

fn history_entry(piece: &Piece) -> ReportEntry<PieceKey> {
    let squares: Vec<String> = piece.history().iter().map(ToString::to_string).collect();
    ReportEntry {
        subject: piece.key(),
        text: format!("{}: [{}]", piece.label(), squares.join(", ")),
    }
}

fn winner_first(winner: Side, a: &Piece, b: &Piece) -> Ordering {
    (a.owner() != winner).cmp(&(b.owner() != winner))
}

/// Winner's pieces first, then ascending steps, then ascending id.
pub fn by_move_count(winner: Side, a: &Piece, b: &Piece) -> Ordering {
    winner_first(winner, a, b)
        .then_with(|| a.steps().cmp(&b.steps()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Descending captures, then ascending id, then winner's pieces first.
pub fn by_captures(winner: Side, a: &Piece, b: &Piece) -> Ordering {
    let captures = |p: &Piece| p.captures().unwrap_or(0);
    captures(b)
        .cmp(&captures(a))
        .then_with(|| a.id().cmp(&b.id()))
        .then_with(|| winner_first(winner, a, b))
}

/// Descending total distance, then ascending id, then winner's pieces first.
pub fn by_distance(winner: Side, a: &Piece, b: &Piece) -> Ordering {
    b.total_distance()
        .cmp(&a.total_distance())
        .then_with(|| a.id().cmp(&b.id()))
        .then_with(|| winner_first(winner, a, b))
}

/// Descending distinct-stepper count, then ascending x, then ascending y.
pub fn by_steppers(a: &(Coordinate, usize), b: &(Coordinate, usize)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| a.0.x().cmp(&b.0.x()))
        .then_with(|| a.0.y().cmp(&b.0.y()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    fn moved_pawn(owner: Side, id: u32, path: &[(i32, i32)]) -> Piece {
        let mut piece = Piece::pawn(owner, id, c(path[0].0, path[0].1));
        for &(x, y) in &path[1..] {
            piece.push_step(c(x, y));
        }
        piece
    }

    fn subjects(entries: &[ReportEntry<PieceKey>]) -> Vec<String> {
        entries.iter().map(|e| e.text.split(':').next().unwrap_or("").to_string()).collect()
    }

    #[test]
    fn move_view_puts_winner_first_then_fewer_steps() {
        let a1 = moved_pawn(Side::Attacker, 1, &[(3, 0), (3, 2)]);
        let a2 = moved_pawn(Side::Attacker, 2, &[(4, 0), (4, 1), (4, 2)]);
        let d1 = moved_pawn(Side::Defender, 1, &[(5, 3), (5, 2), (8, 2)]);
        let d5 = moved_pawn(Side::Defender, 5, &[(3, 5), (3, 6)]);
        let idle = moved_pawn(Side::Defender, 9, &[(7, 5)]);

        let report = GameReport::build(Side::Defender, &[&a1, &a2, &d1, &d5, &idle], &[]);

        assert_eq!(subjects(&report.moves), vec!["D5", "D1", "A1", "A2"]);
        assert_eq!(report.moves[1].text, "D1: [(5, 3), (5, 2), (8, 2)]");
    }

    #[test]
    fn capture_view_orders_by_kills_then_id_then_winner() {
        let mut a3 = moved_pawn(Side::Attacker, 3, &[(5, 0)]);
        let mut d3 = moved_pawn(Side::Defender, 3, &[(5, 4)]);
        let mut a1 = moved_pawn(Side::Attacker, 1, &[(3, 0)]);
        let none = moved_pawn(Side::Attacker, 4, &[(6, 0)]);
        a3.add_captures(1);
        d3.add_captures(1);
        a1.add_captures(2);

        let report = GameReport::build(Side::Attacker, &[&d3, &a3, &a1, &none], &[]);

        assert_eq!(subjects(&report.captures), vec!["A1", "A3", "D3"]);
        assert_eq!(report.captures[0].text, "A1: 2 kills");
    }

    #[test]
    fn distance_view_orders_by_length_then_id_then_winner() {
        let d2 = moved_pawn(Side::Defender, 2, &[(4, 4), (4, 1)]);
        let a2 = moved_pawn(Side::Attacker, 2, &[(4, 0), (4, 1), (7, 1)]);
        let mut king = Piece::king(Side::Defender, 7, c(5, 5)).unwrap();
        king.push_step(c(5, 2));

        let report = GameReport::build(Side::Attacker, &[&d2, &king, &a2], &[]);

        assert_eq!(subjects(&report.distances), vec!["A2", "D2", "K7"]);
        assert_eq!(report.distances[2].text, "K7: 3 squares");
    }

    #[test]
    fn square_view_keeps_shared_squares_only() {
        let squares = [(c(4, 2), 2), (c(1, 1), 1), (c(2, 9), 3), (c(2, 3), 2)];

        let report = GameReport::build(Side::Defender, &[], &squares);
        let texts: Vec<_> = report.squares.iter().map(|e| e.text.as_str()).collect();

        assert_eq!(texts, vec!["(2, 9)3 pieces", "(2, 3)2 pieces", "(4, 2)2 pieces"]);
    }

    #[test]
    fn display_separates_the_four_sections() {
        let d1 = moved_pawn(Side::Defender, 1, &[(5, 3), (5, 2)]);
        let report = GameReport::build(Side::Defender, &[&d1], &[(c(5, 2), 2)]);

        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        let star_line = "*".repeat(75);

        assert_eq!(
            lines,
            vec![
                "D1: [(5, 3), (5, 2)]",
                star_line.as_str(),
                star_line.as_str(),
                "D1: 1 squares",
                star_line.as_str(),
                "(5, 2)2 pieces",
                star_line.as_str(),
            ]
        );
    }
}
