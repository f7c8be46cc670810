//! Terminal position detection

use crate::attack;
use crate::board::Board;
use crate::movegen;
use crate::types::{Color, Coord, Outcome};

/// Returns `true` if the piece on `pos` has at least one legal move
///
/// Returns `false` if `pos` is empty.
#[inline]
pub fn has_legal_moves(b: &Board, pos: Coord) -> bool {
    movegen::has_legal_targets(b, pos)
}

/// Returns `true` if any piece of color `c` has at least one legal move
#[inline]
pub fn has_any_legal_move(b: &Board, c: Color) -> bool {
    movegen::has_any_legal_move(b, c)
}

/// Returns `true` if color `c` is in check and has no legal moves
pub fn is_checkmate(b: &Board, c: Color) -> bool {
    attack::is_in_check(b, c) && !has_any_legal_move(b, c)
}

/// Returns `true` if color `c` is not in check and has no legal moves
pub fn is_stalemate(b: &Board, c: Color) -> bool {
    !attack::is_in_check(b, c) && !has_any_legal_move(b, c)
}

/// Calculates the outcome of the position if `side` is to move
///
/// Returns `None` if `side` has a legal move, so the game goes on.
pub fn calc_outcome(b: &Board, side: Color) -> Option<Outcome> {
    if has_any_legal_move(b, side) {
        return None;
    }
    match attack::is_in_check(b, side) {
        true => Some(Outcome::Checkmate { winner: side.inv() }),
        false => Some(Outcome::Stalemate),
    }
}
