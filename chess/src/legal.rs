//! Legality checking by simulation

use crate::attack;
use crate::board::Board;
use crate::moves::{self, Move};
use crate::types::Color;

/// Checks whether moves leave the king of one side under attack
///
/// The checker owns a private copy of the board. Each candidate move is made on this copy, the
/// king is tested for check, and the move is unmade, so the original board is never touched and
/// only one clone is made per checker.
#[derive(Clone, Debug)]
pub struct Checker {
    board: Board,
    side: Color,
}

impl Checker {
    /// Creates a checker for moves of side `side` in `b`
    pub fn new(b: &Board, side: Color) -> Checker {
        Checker {
            board: b.clone(),
            side,
        }
    }

    /// Returns `true` if the king of the checked side is not attacked after `mv`
    ///
    /// The move must be semilegal for the checked side.
    ///
    /// # Panics
    ///
    /// Panics if the checked side has no king.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let u = moves::make_move(&mut self.board, mv);
        let res = !attack::is_in_check(&self.board, self.side);
        moves::unmake_move(&mut self.board, mv, u);
        res
    }
}

/// Returns `true` if the move `mv` doesn't leave the king of `side` under attack in `b`
pub fn is_legal(b: &Board, side: Color, mv: Move) -> bool {
    Checker::new(b, side).is_legal(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen;
    use std::str::FromStr;

    fn mv(s: &str) -> Move {
        Move::from_str(s).unwrap()
    }

    #[test]
    fn test_pinned() {
        let b = Board::from_fen("4k3/8/8/b7/8/8/3N4/4K3").unwrap();
        let mut checker = Checker::new(&b, Color::White);
        assert!(!checker.is_legal(mv("d2b3")));
        assert!(!checker.is_legal(mv("d2f3")));
        assert!(checker.is_legal(mv("e1f1")));
        assert!(checker.is_legal(mv("e1d1")));
        assert_eq!(b, Board::from_fen("4k3/8/8/b7/8/8/3N4/4K3").unwrap());
    }

    #[test]
    fn test_king_into_attack() {
        let b = Board::from_fen("4k3/8/8/8/8/8/r7/4K3").unwrap();
        assert!(!is_legal(&b, Color::White, mv("e1e2")));
        assert!(!is_legal(&b, Color::White, mv("e1d2")));
        assert!(is_legal(&b, Color::White, mv("e1d1")));
        assert!(is_legal(&b, Color::White, mv("e1f1")));
    }

    #[test]
    fn test_block_or_capture() {
        let b = Board::from_fen("4k3/8/8/8/1B6/8/8/r3K3").unwrap();
        let mut checker = Checker::new(&b, Color::White);
        assert!(!checker.is_legal(mv("b4c5")));
        assert!(!checker.is_legal(mv("e1f1")));
        assert!(checker.is_legal(mv("e1e2")));
        assert!(checker.is_legal(mv("e1d2")));

        let b = Board::from_fen("4k3/8/8/8/8/8/3B4/r3K3").unwrap();
        let legal: Vec<_> = movegen::gen_legal(&b, Color::White)
            .iter()
            .filter(|m| m.src() == mv("d2c1").src())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(legal, vec!["d2c1".to_string()]);
    }
}
