//! Initial placement loader.
//!
//! A layout is plain text, one piece per line:
//!
//! ```text
//! (x, y) -> {owner}{type}{id}
//! ```
//!
//! `owner` is `1` (Defender) or `2` (Attacker), `type` is `p` (pawn) or `k`
//! (king) and `id` is a positive integer. Whitespace inside a line is
//! ignored and blank lines are skipped. Anything else fails the whole load.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::board::{BoardGeometry, Coordinate};
use crate::error::{TaflError, TaflResult};
use crate::piece::Piece;
use crate::types::Side;

/// The 11x11 opening position.
pub const STANDARD_LAYOUT: &str = "\
(3, 0) -> 2p1
(4, 0) -> 2p2
(5, 0) -> 2p3
(6, 0) -> 2p4
(7, 0) -> 2p5
(5, 1) -> 2p6

(0, 3) -> 2p7
(0, 4) -> 2p9
(0, 5) -> 2p11
(0, 6) -> 2p15
(0, 7) -> 2p17
(1, 5) -> 2p12

(5, 3) -> 1p1
(4, 4) -> 1p2
(5, 4) -> 1p3
(6, 4) -> 1p4
(3, 5) -> 1p5
(4, 5) -> 1p6
(5, 5) -> 1k7
(6, 5) -> 1p8
(7, 5) -> 1p9
(4, 6) -> 1p10
(5, 6) -> 1p11
(6, 6) -> 1p12
(5, 7) -> 1p13

(10, 3) -> 2p8
(10, 4) -> 2p10
(9, 5)  -> 2p13
(10, 5) -> 2p14
(10, 6) -> 2p16
(10, 7) -> 2p18

(3, 10) -> 2p20
(4, 10) -> 2p21
(5, 9)  -> 2p19
(5, 10) -> 2p22
(6, 10) -> 2p23
(7, 10) -> 2p24
";

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\((\d+),(\d+)\)->(\d)([A-Za-z])(\d+)$").expect("layout line pattern is valid")
});

/// Pieces by the square they spawn on.
pub type Placement = HashMap<Coordinate, Piece>;

/// Parses a layout against `geometry`.
///
/// Besides the per-line format, the result must hold exactly one king, no
/// square twice and no piece identity twice.
pub fn parse_layout(text: &str, geometry: BoardGeometry) -> TaflResult<Placement> {
    let mut placement = Placement::new();
    let mut identities = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        if compact.is_empty() {
            continue;
        }

        let (square, piece) = parse_line(line, &compact, geometry)?;
        if placement.contains_key(&square) {
            return Err(TaflError::DuplicateSquare { line, square });
        }
        if !identities.insert(piece.key()) {
            return Err(TaflError::DuplicatePiece {
                line,
                piece: piece.key(),
            });
        }
        placement.insert(square, piece);
    }

    let kings = placement.values().filter(|piece| piece.is_king()).count();
    if kings != 1 {
        return Err(TaflError::KingCount { found: kings });
    }

    Ok(placement)
}

fn parse_line(line: usize, compact: &str, geometry: BoardGeometry) -> TaflResult<(Coordinate, Piece)> {
    let malformed = || TaflError::MalformedLine {
        line,
        text: compact.to_string(),
    };
    let caps = LINE_PATTERN.captures(compact).ok_or_else(malformed)?;

    let x: i64 = caps[1].parse().map_err(|_| malformed())?;
    let y: i64 = caps[2].parse().map_err(|_| malformed())?;
    let square = square_at(geometry, x, y)?;

    let owner_char = first_char(&caps[3]);
    let owner = owner_char
        .to_digit(10)
        .and_then(|digit| u8::try_from(digit).ok())
        .and_then(Side::from_number)
        .ok_or(TaflError::UnknownOwner {
            line,
            owner: owner_char,
        })?;

    let id: u32 = caps[5].parse().map_err(|_| malformed())?;
    if id == 0 {
        return Err(malformed());
    }

    let piece = match first_char(&caps[4]) {
        'p' => Piece::pawn(owner, id, square),
        'k' => Piece::king(owner, id, square)?,
        kind => return Err(TaflError::UnknownPieceType { line, kind }),
    };

    Ok((square, piece))
}

fn square_at(geometry: BoardGeometry, x: i64, y: i64) -> TaflResult<Coordinate> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => geometry.coordinate(x, y),
        _ => Err(TaflError::CoordinateOutOfRange {
            x,
            y,
            size: geometry.size(),
        }),
    }
}

// Capture groups 3 and 4 match exactly one character.
fn first_char(group: &str) -> char {
    group.chars().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TaflResult<Placement> {
        parse_layout(text, BoardGeometry::STANDARD)
    }

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn standard_layout_places_37_pieces_around_the_king() {
        let placement = parse(STANDARD_LAYOUT).unwrap();

        assert_eq!(placement.len(), 37);
        let attackers = placement
            .values()
            .filter(|piece| piece.owner() == Side::Attacker)
            .count();
        assert_eq!(attackers, 24);

        let king = &placement[&c(5, 5)];
        assert!(king.is_king());
        assert_eq!(king.id(), 7);
        assert_eq!(king.history(), &[c(5, 5)]);
    }

    #[test]
    fn whitespace_and_blank_lines_are_ignored() {
        let placement = parse("\n  ( 1 ,2 )-> 2 p 4 \n\n(5,5)->1k1\n\t\n").unwrap();

        assert_eq!(placement.len(), 2);
        assert_eq!(placement[&c(1, 2)].label(), "A4");
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let err = parse("(5,5)->1k1\n5,5 -> 1p2").unwrap_err();

        assert_eq!(
            err,
            TaflError::MalformedLine {
                line: 2,
                text: "5,5->1p2".to_string()
            }
        );
    }

    #[test]
    fn zero_id_is_rejected() {
        assert_eq!(
            parse("(5,5)->1k1\n(1,1)->2p0").unwrap_err(),
            TaflError::MalformedLine {
                line: 2,
                text: "(1,1)->2p0".to_string()
            }
        );
    }

    #[test]
    fn unknown_owner_and_type_are_rejected() {
        assert_eq!(
            parse("(5,5)->1k1\n(1,1)->3p2").unwrap_err(),
            TaflError::UnknownOwner { line: 2, owner: '3' }
        );
        assert_eq!(
            parse("(5,5)->1k1\n(1,1)->2q2").unwrap_err(),
            TaflError::UnknownPieceType { line: 2, kind: 'q' }
        );
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        assert_eq!(
            parse("(5,5)->1k1\n(11,0)->2p1").unwrap_err(),
            TaflError::CoordinateOutOfRange {
                x: 11,
                y: 0,
                size: 11
            }
        );
    }

    #[test]
    fn attacker_king_is_rejected() {
        assert_eq!(
            parse("(5,5)->2k1").unwrap_err(),
            TaflError::AttackerKing { id: 1 }
        );
    }

    #[test]
    fn placement_must_be_unambiguous() {
        assert_eq!(
            parse("(5,5)->1k1\n(5,5)->2p1").unwrap_err(),
            TaflError::DuplicateSquare {
                line: 2,
                square: c(5, 5)
            }
        );
        assert!(matches!(
            parse("(5,5)->1k1\n(1,1)->2p1\n(2,2)->2p1").unwrap_err(),
            TaflError::DuplicatePiece { line: 3, .. }
        ));
    }

    #[test]
    fn exactly_one_king_is_required() {
        assert_eq!(
            parse("(1,1)->2p1").unwrap_err(),
            TaflError::KingCount { found: 0 }
        );
        assert_eq!(
            parse("(5,5)->1k1\n(4,4)->1k2").unwrap_err(),
            TaflError::KingCount { found: 2 }
        );
    }
}
