//! Movement geometry
//!
//! All the deltas here are `(d_row, d_col)` pairs. Rows grow towards White, so White pawns
//! move towards decreasing rows.

use crate::types::{Color, Rank};

/// Rank on which pawns of color `c` stand in the initial position
pub const fn pawn_home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank where a pawn of color `c` gets promoted
pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Back rank of color `c` in the initial position
pub const fn back_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Row delta of a single pawn step for color `c`
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
