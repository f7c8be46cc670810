use crate::board::Board;
use crate::types::{Cell, Color, Coord, CoordParseError, Piece};
use crate::{geometry, legal, movegen};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Chess move
///
/// A move is just a pair of squares: the piece standing on `src` goes to `dst`. Whatever stood
/// on `dst` before is captured. A pawn reaching the last rank always becomes a queen, so no
/// promotion piece needs to be stored.
///
/// Moves can have different degrees of validity:
///
/// - _Semilegal_. The piece on `src` can reach `dst` by its movement rules, and `dst` is not
///   occupied by a piece of the same color. The king may remain under attack after such move.
///
/// - _Legal_. The move is semilegal and the king of the moving side is not under attack after
///   it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    src: Coord,
    dst: Coord,
}

/// Error indicating that move is invalid
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Source square is empty
    #[error("no piece on source square")]
    NoPiece,
    /// Move is not semi-legal
    #[error("move is not semi-legal")]
    NotSemiLegal,
    /// Move is not legal
    #[error("move is not legal")]
    NotLegal,
}

/// Error parsing move from its text form
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(#[source] CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(#[source] CoordParseError),
    /// Source and destination are the same
    #[error("source and destination are equal")]
    SameSquare,
}

impl Move {
    /// Creates a move from `src` to `dst`
    ///
    /// # Panics
    ///
    /// Panics if `src == dst`.
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        assert!(src.index() != dst.index(), "move to the same square");
        Move { src, dst }
    }

    /// Source square
    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    /// Destination square
    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns `true` if the move is semilegal in `b`
    pub fn is_semilegal(&self, b: &Board) -> bool {
        b.get(self.src).is_occupied() && movegen::attacks(b, self.src).has(self.dst)
    }

    /// Returns `true` if the move is legal in `b`
    pub fn is_legal(&self, b: &Board) -> bool {
        self.validate(b).is_ok()
    }

    /// Validates whether this move is semilegal in `b`
    pub fn semi_validate(&self, b: &Board) -> Result<(), ValidateError> {
        if b.get(self.src).is_free() {
            return Err(ValidateError::NoPiece);
        }
        if !self.is_semilegal(b) {
            return Err(ValidateError::NotSemiLegal);
        }
        Ok(())
    }

    /// Validates whether this move is legal in `b`
    ///
    /// The side is taken from the piece on the source square.
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        self.semi_validate(b)?;
        let color = move_side(b, *self).ok_or(ValidateError::NoPiece)?;
        match legal::is_legal(b, color, *self) {
            true => Ok(()),
            false => Err(ValidateError::NotLegal),
        }
    }

    /// Returns the board after making this move from `b`, if the move is legal
    pub fn make(&self, b: &Board) -> Result<Board, ValidateError> {
        self.validate(b)?;
        let mut res = b.clone();
        let _ = make_move(&mut res, *self);
        Ok(res)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(ParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(ParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(ParseError::BadDst)?;
        if src == dst {
            return Err(ParseError::SameSquare);
        }
        Ok(Move { src, dst })
    }
}

/// Metadata necessary to undo the applied move
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawUndo {
    src_cell: Cell,
    dst_cell: Cell,
}

impl RawUndo {
    /// Contents of the source square before the move
    #[inline]
    pub fn src_cell(&self) -> Cell {
        self.src_cell
    }

    /// Contents of the destination square before the move, i.e. the captured piece if any
    #[inline]
    pub fn dst_cell(&self) -> Cell {
        self.dst_cell
    }

    /// Returns `true` if the move turned a pawn into a queen
    #[inline]
    pub fn is_promote(&self, mv: Move) -> bool {
        promoted(self.src_cell, mv.dst).is_some()
    }
}

fn promoted(cell: Cell, dst: Coord) -> Option<Cell> {
    match cell.parts() {
        Some((color, Piece::Pawn)) if dst.rank() == geometry::promote_rank(color) => {
            Some(Cell::from_parts(color, Piece::Queen))
        }
        _ => None,
    }
}

/// Makes the move `mv` on the board `b`
///
/// The move is not checked in any way: the contents of `src` are moved to `dst`, overwriting it.
/// A pawn which lands on its last rank is replaced with a queen of the same color.
///
/// To allow unmaking the move, a `RawUndo` instance is returned. See [`unmake_move()`]
/// for the details on how to unmake a move.
pub fn make_move(b: &mut Board, mv: Move) -> RawUndo {
    let undo = RawUndo {
        src_cell: b.get(mv.src),
        dst_cell: b.get(mv.dst),
    };
    b.put(mv.dst, undo.src_cell);
    b.clear(mv.src);
    if let Some(queen) = promoted(undo.src_cell, mv.dst) {
        b.put(mv.dst, queen);
    }
    undo
}

/// Unmakes the move `mv` on the board `b`
///
/// You may invoke this function only on the position occured after the corresponding call to
/// [`make_move()`], otherwise the board contents become garbage.
pub fn unmake_move(b: &mut Board, mv: Move, u: RawUndo) {
    b.put(mv.src, u.src_cell);
    b.put(mv.dst, u.dst_cell);
}

/// Returns the color of the piece which makes the move `mv` in `b`
#[inline]
pub fn move_side(b: &Board, mv: Move) -> Option<Color> {
    b.get(mv.src).color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use std::mem;

    fn mv(s: &str) -> Move {
        Move::from_str(s).unwrap()
    }

    #[test]
    fn test_size() {
        assert_eq!(mem::size_of::<Move>(), 2);
    }

    #[test]
    fn test_parse() {
        assert_eq!(mv("e2e4").to_string(), "e2e4");
        assert_eq!(mv("e2e4").src(), Coord::from_str("e2").unwrap());
        assert_eq!(mv("e2e4").dst(), Coord::from_str("e4").unwrap());
        assert_eq!(Move::from_str("e2e"), Err(ParseError::BadLength));
        assert_eq!(Move::from_str("e2e4q"), Err(ParseError::BadLength));
        assert!(matches!(Move::from_str("i2e4"), Err(ParseError::BadSrc(_))));
        assert!(matches!(Move::from_str("e2e9"), Err(ParseError::BadDst(_))));
        assert_eq!(Move::from_str("e2e2"), Err(ParseError::SameSquare));
    }

    #[test]
    fn test_simple() {
        let mut b = Board::initial();
        for (mv_str, fen_str) in [
            ("e2e4", "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"),
            ("b8c6", "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR"),
            ("g1f3", "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R"),
            ("e7e5", "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
            ("f3e5", "r1bqkbnr/pppp1ppp/2n5/4N3/4P3/8/PPPP1PPP/RNBQKB1R"),
            ("c6e5", "r1bqkbnr/pppp1ppp/8/4n3/4P3/8/PPPP1PPP/RNBQKB1R"),
        ] {
            b = mv(mv_str).make(&b).unwrap();
            assert_eq!(b.as_fen(), fen_str);
        }
    }

    #[test]
    fn test_capture() {
        let mut b = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let m = mv("e4d5");
        let u = make_move(&mut b, m);
        assert_eq!(u.dst_cell(), Cell::from_parts(Color::Black, Piece::Pawn));
        assert_eq!(u.src_cell(), Cell::from_parts(Color::White, Piece::Pawn));
        assert!(!u.is_promote(m));
        assert_eq!(b.as_fen(), "4k3/8/8/3P4/8/8/8/4K3");
    }

    #[test]
    fn test_promote() {
        let mut b = Board::from_fen("1b1b1K2/2P5/8/8/7k/8/6p1/8").unwrap();
        let b_copy = b.clone();

        for (mv_str, fen_str) in [
            ("c7c8", "1bQb1K2/8/8/8/7k/8/6p1/8"),
            ("c7b8", "1Q1b1K2/8/8/8/7k/8/6p1/8"),
            ("c7d8", "1b1Q1K2/8/8/8/7k/8/6p1/8"),
            ("g2g1", "1b1b1K2/2P5/8/8/7k/8/8/6q1"),
        ] {
            let m = mv(mv_str);
            let u = make_move(&mut b, m);
            assert!(u.is_promote(m));
            assert_eq!(b.as_fen(), fen_str);
            unmake_move(&mut b, m, u);
            assert_eq!(b, b_copy);
        }
    }

    #[test]
    fn test_undo() {
        let mut b = Board::from_fen("r1bqk2r/ppp2ppp/2np1n2/1Bb1p3/4P3/2PP1N2/PP3PPP/RNBQK2R").unwrap();
        let b_copy = b.clone();

        for (mv_str, fen_str) in [
            ("f3e5", "r1bqk2r/ppp2ppp/2np1n2/1Bb1N3/4P3/2PP4/PP3PPP/RNBQK2R"),
            ("b2b4", "r1bqk2r/ppp2ppp/2np1n2/1Bb1p3/1P2P3/2PP1N2/P4PPP/RNBQK2R"),
            ("b5c6", "r1bqk2r/ppp2ppp/2Bp1n2/2b1p3/4P3/2PP1N2/PP3PPP/RNBQK2R"),
        ] {
            let m = mv(mv_str);
            let u = make_move(&mut b, m);
            assert_eq!(b.as_fen(), fen_str);
            unmake_move(&mut b, m, u);
            assert_eq!(b, b_copy);
        }
    }

    #[test]
    fn test_legal() {
        let b = Board::from_fen("r1bqk2r/ppp2ppp/2np1n2/1Bb1p3/4P3/2PP1N2/PP3PPP/RNBQK2R").unwrap();

        assert_eq!(mv("e1g1").semi_validate(&b), Err(ValidateError::NotSemiLegal));
        assert_eq!(mv("b5e8").semi_validate(&b), Err(ValidateError::NotSemiLegal));
        assert_eq!(mv("a3a4").semi_validate(&b), Err(ValidateError::NoPiece));
        assert_eq!(mv("e1d1").semi_validate(&b), Err(ValidateError::NotSemiLegal));
        assert!(mv("c6b4").is_semilegal(&b));
        assert_eq!(move_side(&b, mv("c6b4")), Some(Color::Black));
        assert_eq!(mv("c6b4").validate(&b), Err(ValidateError::NotLegal));
        assert!(!mv("c6b4").is_legal(&b));
        assert!(mv("f6e4").is_legal(&b));
        assert_eq!(mv("b5c6").validate(&b), Ok(()));
        assert_eq!(move_side(&b, mv("b5c6")), Some(Color::White));

        let pinned = Board::from_fen("4k3/8/8/8/8/2b5/3N4/4K3").unwrap();
        assert!(mv("d2b3").is_semilegal(&pinned));
        assert_eq!(mv("d2b3").validate(&pinned), Err(ValidateError::NotLegal));
        assert_eq!(mv("d2b3").make(&pinned), Err(ValidateError::NotLegal));
        assert!(mv("e1f1").is_legal(&pinned));
    }
}
