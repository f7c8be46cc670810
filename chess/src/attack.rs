//! Attack and check detection
//!
//! Attacks are computed from the unfiltered candidates of [`movegen::attacks()`], i.e. without
//! the legality stage. So check detection never recurses into itself.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::movegen;
use crate::types::{Color, Coord};

/// Returns the pieces of color `by` which attack the square `coord`
///
/// Pawns count as attackers only when `coord` holds a piece of the opposite color. This is
/// always true for the square of the king being checked.
pub fn cell_attackers(b: &Board, coord: Coord, by: Color) -> Bitboard {
    b.pieces(by)
        .map(|(src, _)| src)
        .filter(|&src| movegen::attacks(b, src).has(coord))
        .collect()
}

/// Returns `true` if any piece of color `by` attacks the square `coord`
///
/// See [`cell_attackers()`] for the caveat about pawns.
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    b.pieces(by)
        .any(|(src, _)| movegen::attacks(b, src).has(coord))
}

/// Returns the pieces giving check to the king of color `c`
///
/// # Panics
///
/// Panics if there is no king of color `c` on the board.
pub fn checkers(b: &Board, c: Color) -> Bitboard {
    cell_attackers(b, king_of(b, c), c.inv())
}

/// Returns `true` if the king of color `c` is under attack
///
/// # Panics
///
/// Panics if there is no king of color `c` on the board. A legal game never reaches such a
/// position, so this indicates a broken board.
pub fn is_in_check(b: &Board, c: Color) -> bool {
    is_cell_attacked(b, king_of(b, c), c.inv())
}

fn king_of(b: &Board, c: Color) -> Coord {
    match b.king_pos(c) {
        Some(king) => king,
        None => panic!("no king of color {:?} on the board", c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_cell_attackers() {
        let b = Board::from_fen("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k").unwrap();
        let d4 = Coord::from_parts(File::D, Rank::R4);
        assert!(is_cell_attacked(&b, d4, Color::White));
        let attackers = Bitboard::EMPTY
            .with(Coord::from_parts(File::D, Rank::R6))
            .with(Coord::from_parts(File::B, Rank::R5))
            .with(Coord::from_parts(File::E, Rank::R5))
            .with(Coord::from_parts(File::B, Rank::R3))
            .with(Coord::from_parts(File::C, Rank::R3))
            .with(Coord::from_parts(File::F, Rank::R2))
            .with(Coord::from_parts(File::D, Rank::R1));
        assert_eq!(cell_attackers(&b, d4, Color::White), attackers);
        assert!(!is_cell_attacked(&b, d4, Color::Black));
        assert_eq!(cell_attackers(&b, d4, Color::Black), Bitboard::EMPTY);

        let b = Board::from_fen("8/8/8/2KPk3/8/8/8/8").unwrap();
        let d5 = Coord::from_parts(File::D, Rank::R5);
        assert_eq!(
            cell_attackers(&b, d5, Color::Black),
            Bitboard::from_coord(Coord::from_parts(File::E, Rank::R5)),
        );
        assert!(!is_cell_attacked(&b, d5, Color::White));
    }

    #[test]
    fn test_check() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/r3K3").unwrap();
        assert!(is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
        assert_eq!(
            checkers(&b, Color::White),
            Bitboard::from_coord(Coord::from_parts(File::A, Rank::R1))
        );

        let b = Board::from_fen("4k3/8/8/8/8/8/8/r1N1K3").unwrap();
        assert!(!is_in_check(&b, Color::White));
        assert_eq!(checkers(&b, Color::White), Bitboard::EMPTY);
    }

    #[test]
    fn test_pawn_and_knight_checks() {
        let b = Board::from_fen("4k3/8/8/8/8/8/3p4/4K3").unwrap();
        assert!(is_in_check(&b, Color::White));

        let b = Board::from_fen("4k3/8/8/8/8/8/4p3/4K3").unwrap();
        assert!(!is_in_check(&b, Color::White));

        let b = Board::from_fen("4k3/8/3N4/8/8/8/8/4K3").unwrap();
        assert!(is_in_check(&b, Color::Black));
        assert!(!is_in_check(&b, Color::White));
    }

    #[test]
    #[should_panic(expected = "no king of color White")]
    fn test_no_king() {
        let mut b = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        b.clear(Coord::from_parts(File::E, Rank::R1));
        is_in_check(&b, Color::White);
    }
}
