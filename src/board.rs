use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TaflError, TaflResult};

pub const STANDARD_BOARD_SIZE: u8 = 11;

/// Orthogonal unit steps: left, right, up, down.
pub const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Board dimensions shared by every component that needs to know where the
/// board ends. Only the 11x11 board is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardGeometry {
    size: u8,
}

impl BoardGeometry {
    pub const STANDARD: Self = Self {
        size: STANDARD_BOARD_SIZE,
    };

    /// Width and height of the (square) board.
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let size = i32::from(self.size);
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    /// Builds a coordinate, failing when `(x, y)` lies off this board.
    pub fn coordinate(&self, x: i32, y: i32) -> TaflResult<Coordinate> {
        if !self.contains(x, y) {
            return Err(TaflError::CoordinateOutOfRange {
                x: i64::from(x),
                y: i64::from(y),
                size: self.size,
            });
        }
        Ok(Coordinate {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Both coordinates sit on an outer line.
    pub fn is_corner(&self, coordinate: Coordinate) -> bool {
        let last = self.size - 1;
        (coordinate.x == 0 || coordinate.x == last) && (coordinate.y == 0 || coordinate.y == last)
    }

    /// At least one coordinate sits on an outer line.
    pub fn is_edge(&self, coordinate: Coordinate) -> bool {
        let last = self.size - 1;
        coordinate.x == 0 || coordinate.y == 0 || coordinate.x == last || coordinate.y == last
    }

    /// The square `(dx, dy)` away from `coordinate`, or `None` past the edge.
    pub fn offset(&self, coordinate: Coordinate, dx: i32, dy: i32) -> Option<Coordinate> {
        self.coordinate(i32::from(coordinate.x) + dx, i32::from(coordinate.y) + dy)
            .ok()
    }

    /// Every square, row by row (`y` outer, `x` inner).
    pub fn squares(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Coordinate { x, y }))
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<u8> for BoardGeometry {
    type Error = TaflError;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        if size != STANDARD_BOARD_SIZE {
            return Err(TaflError::UnsupportedBoardSize { size });
        }
        Ok(Self { size })
    }
}

impl From<BoardGeometry> for u8 {
    fn from(geometry: BoardGeometry) -> Self {
        geometry.size
    }
}

/// A square on the board. Equality, hashing and ordering use `(x, y)` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    x: u8,
    y: u8,
}

impl Coordinate {
    /// Builds a coordinate on the standard board.
    pub fn new(x: i32, y: i32) -> TaflResult<Self> {
        BoardGeometry::STANDARD.coordinate(x, y)
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    pub fn is_corner(self) -> bool {
        BoardGeometry::STANDARD.is_corner(self)
    }

    pub fn is_edge(self) -> bool {
        BoardGeometry::STANDARD.is_edge(self)
    }

    /// Length of the orthogonal slide between two squares, `None` when they
    /// do not share a row or column.
    pub fn straight_distance(self, other: Coordinate) -> Option<u32> {
        if self.x == other.x {
            Some(u32::from(self.y.abs_diff(other.y)))
        } else if self.y == other.y {
            Some(u32::from(self.x.abs_diff(other.x)))
        } else {
            None
        }
    }

    /// Squares crossed by a slide to `dst`: starts next to `self`, ends on
    /// `dst` inclusive. `None` for a null or non-orthogonal slide.
    pub fn path_to(self, dst: Coordinate) -> Option<Path> {
        if self == dst {
            return None;
        }
        let remaining = self.straight_distance(dst)?;
        let step = (
            (i32::from(dst.x) - i32::from(self.x)).signum(),
            (i32::from(dst.y) - i32::from(self.y)).signum(),
        );
        Some(Path {
            current: (i32::from(self.x), i32::from(self.y)),
            step,
            remaining,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Iterator returned by [`Coordinate::path_to`].
#[derive(Debug, Clone)]
pub struct Path {
    current: (i32, i32),
    step: (i32, i32),
    remaining: u32,
}

impl Iterator for Path {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.current = (self.current.0 + self.step.0, self.current.1 + self.step.1);
        // Both endpoints are on the board, so every square between them is too.
        Some(Coordinate {
            x: self.current.0 as u8,
            y: self.current.1 as u8,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize;
        (len, Some(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn construction_rejects_out_of_range_values() {
        assert_eq!(
            Coordinate::new(11, 0),
            Err(TaflError::CoordinateOutOfRange {
                x: 11,
                y: 0,
                size: 11
            })
        );
        assert!(Coordinate::new(0, -1).is_err());
        assert!(Coordinate::new(10, 10).is_ok());
    }

    #[test]
    fn only_the_four_corners_are_corners() {
        let corners: Vec<_> = BoardGeometry::STANDARD
            .squares()
            .filter(|sq| sq.is_corner())
            .collect();

        assert_eq!(corners, vec![c(0, 0), c(10, 0), c(0, 10), c(10, 10)]);
        assert!(c(0, 5).is_edge());
        assert!(!c(0, 5).is_corner());
        assert!(!c(5, 5).is_edge());
    }

    #[test]
    fn path_excludes_source_and_includes_destination() {
        let path: Vec<_> = c(5, 5).path_to(c(5, 2)).unwrap().collect();
        assert_eq!(path, vec![c(5, 4), c(5, 3), c(5, 2)]);

        let path: Vec<_> = c(1, 3).path_to(c(3, 3)).unwrap().collect();
        assert_eq!(path, vec![c(2, 3), c(3, 3)]);
    }

    #[test]
    fn path_is_none_for_null_or_diagonal_slides() {
        assert!(c(4, 4).path_to(c(4, 4)).is_none());
        assert!(c(4, 4).path_to(c(5, 5)).is_none());
    }

    #[test]
    fn straight_distance_is_symmetric() {
        assert_eq!(c(2, 7).straight_distance(c(2, 1)), Some(6));
        assert_eq!(c(2, 1).straight_distance(c(2, 7)), Some(6));
        assert_eq!(c(2, 1).straight_distance(c(3, 2)), None);
    }

    #[test]
    fn offset_stops_at_the_edge() {
        let geometry = BoardGeometry::STANDARD;
        assert_eq!(geometry.offset(c(0, 4), -1, 0), None);
        assert_eq!(geometry.offset(c(0, 4), 1, 0), Some(c(1, 4)));
        assert_eq!(geometry.offset(c(10, 10), 0, 1), None);
    }

    #[test]
    fn geometry_only_accepts_the_standard_size() {
        assert_eq!(BoardGeometry::try_from(11), Ok(BoardGeometry::STANDARD));
        assert_eq!(
            BoardGeometry::try_from(9),
            Err(TaflError::UnsupportedBoardSize { size: 9 })
        );
    }
}
