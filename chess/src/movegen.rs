//! Move generation
//!
//! Generation is a pipeline. The raw stage yields squares reachable by the piece movement rules
//! (ray walking for sliders, fixed offsets for leapers, the pawn rules for pawns). The structural
//! stage drops squares occupied by pieces of the moving side. The legal stage drops moves after
//! which the king of the moving side is under attack.
//!
//! Each stage is a [`MaybeMovePush`] wrapping the next one, so the same generator serves all of
//! them.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry::{self, BISHOP_DIRS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRS};
use crate::legal::Checker;
use crate::moves::Move;
use crate::types::{Color, Coord, Piece};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Receiver of generated moves which may stop the generation early
pub trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// List of moves
///
/// No position has more than 256 moves for one side, so the list never allocates.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut MoveList {
    type Item = &'a mut Move;
    type IntoIter = slice::IterMut<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Receiver of generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

/// Collects destination squares only
impl MovePush for Bitboard {
    fn push(&mut self, m: Move) {
        self.set(m.dst());
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

/// Drops moves onto squares occupied by pieces of the moving side
struct OwnColorFilter<'a, P> {
    board: &'a Board,
    color: Color,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> OwnColorFilter<'a, P> {
    fn new(board: &'a Board, color: Color, inner: &'a mut P) -> Self {
        Self {
            board,
            color,
            inner,
        }
    }
}

impl<'a, P: MaybeMovePush> MaybeMovePush for OwnColorFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        match self.board.get(mv.dst()).color() == Some(self.color) {
            true => Ok(()),
            false => self.inner.push(mv),
        }
    }
}

/// Drops moves after which the king of the moving side is attacked
struct LegalFilter<'a, P> {
    checker: Checker,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> LegalFilter<'a, P> {
    fn new(board: &Board, color: Color, inner: &'a mut P) -> Self {
        Self {
            checker: Checker::new(board, color),
            inner,
        }
    }
}

impl<'a, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        match self.checker.is_legal(mv) {
            true => self.inner.push(mv),
            false => Ok(()),
        }
    }
}

struct MoveGenImpl<'a, P> {
    board: &'a Board,
    dst: &'a mut P,
}

impl<'a, P: MaybeMovePush> MoveGenImpl<'a, P> {
    fn new(board: &'a Board, dst: &'a mut P) -> Self {
        MoveGenImpl { board, dst }
    }

    fn add_move(&mut self, src: Coord, dst: Coord) -> Result<(), P::Err> {
        self.dst.push(Move::new(src, dst))
    }

    fn gen_pawn(&mut self, src: Coord, color: Color) -> Result<(), P::Err> {
        let fwd = geometry::pawn_forward_delta(color);

        if let Some(single) = src.try_shift(fwd, 0) {
            if self.board.get(single).is_free() {
                self.add_move(src, single)?;
                if src.rank() == geometry::pawn_home_rank(color) {
                    if let Some(double) = src.try_shift(2 * fwd, 0) {
                        if self.board.get(double).is_free() {
                            self.add_move(src, double)?;
                        }
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            if let Some(dst) = src.try_shift(fwd, d_col) {
                if self.board.get(dst).color() == Some(color.inv()) {
                    self.add_move(src, dst)?;
                }
            }
        }

        Ok(())
    }

    fn gen_leaper(&mut self, src: Coord, deltas: &[(isize, isize)]) -> Result<(), P::Err> {
        for &(d_row, d_col) in deltas {
            if let Some(dst) = src.try_shift(d_row, d_col) {
                self.add_move(src, dst)?;
            }
        }
        Ok(())
    }

    fn gen_slider(&mut self, src: Coord, dirs: &[(isize, isize)]) -> Result<(), P::Err> {
        for &(d_row, d_col) in dirs {
            let mut cur = src;
            while let Some(dst) = cur.try_shift(d_row, d_col) {
                self.add_move(src, dst)?;
                if self.board.get(dst).is_occupied() {
                    break;
                }
                cur = dst;
            }
        }
        Ok(())
    }

    fn gen_piece(&mut self, src: Coord) -> Result<(), P::Err> {
        let (color, piece) = match self.board.get(src).parts() {
            Some(parts) => parts,
            None => return Ok(()),
        };
        match piece {
            Piece::Pawn => self.gen_pawn(src, color),
            Piece::King => self.gen_leaper(src, &KING_DELTAS),
            Piece::Knight => self.gen_leaper(src, &KNIGHT_DELTAS),
            Piece::Bishop => self.gen_slider(src, &BISHOP_DIRS),
            Piece::Rook => self.gen_slider(src, &ROOK_DIRS),
            Piece::Queen => {
                self.gen_slider(src, &ROOK_DIRS)?;
                self.gen_slider(src, &BISHOP_DIRS)
            }
        }
    }

    fn gen_side(&mut self, color: Color) -> Result<(), P::Err> {
        let board = self.board;
        for (src, _) in board.pieces(color) {
            self.gen_piece(src)?;
        }
        Ok(())
    }
}

fn piece_color(b: &Board, src: Coord) -> Option<Color> {
    b.get(src).color()
}

/// Returns the squares reachable by the piece on `src` by its movement rules alone
///
/// Squares occupied by pieces of the same color are not filtered out. Returns an empty set if
/// `src` is empty.
pub fn raw_targets(b: &Board, src: Coord) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    let _ = MoveGenImpl::new(b, &mut res).gen_piece(src);
    res
}

/// Returns the squares the piece on `src` can move to if the safety of its own king is ignored
///
/// These are exactly the squares attacked by the piece, except that pawns attack only
/// occupied squares. Check detection is built on top of this function.
pub fn attacks(b: &Board, src: Coord) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    if let Some(color) = piece_color(b, src) {
        let mut p = OwnColorFilter::new(b, color, &mut res);
        let _ = MoveGenImpl::new(b, &mut p).gen_piece(src);
    }
    res
}

/// Returns the squares the piece on `src` can legally move to
pub fn legal_targets(b: &Board, src: Coord) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    gen_piece_legal(b, src, &mut res);
    res
}

/// Pushes all the legal moves of the piece on `src` to `dst`
pub fn gen_piece_legal<P: MovePush>(b: &Board, src: Coord, dst: &mut P) {
    let color = match piece_color(b, src) {
        Some(color) => color,
        None => return,
    };
    let mut legal = LegalFilter::new(b, color, dst);
    let mut p = OwnColorFilter::new(b, color, &mut legal);
    let _ = MoveGenImpl::new(b, &mut p).gen_piece(src);
}

/// Pushes all the semilegal moves of side `c` to `dst`
pub fn gen_semilegal_into<P: MovePush>(b: &Board, c: Color, dst: &mut P) {
    let mut p = OwnColorFilter::new(b, c, dst);
    let _ = MoveGenImpl::new(b, &mut p).gen_side(c);
}

/// Pushes all the legal moves of side `c` to `dst`
pub fn gen_legal_into<P: MovePush>(b: &Board, c: Color, dst: &mut P) {
    let mut legal = LegalFilter::new(b, c, dst);
    let mut p = OwnColorFilter::new(b, c, &mut legal);
    let _ = MoveGenImpl::new(b, &mut p).gen_side(c);
}

/// Returns all the semilegal moves of side `c`
pub fn gen_semilegal(b: &Board, c: Color) -> MoveList {
    let mut res = MoveList::new();
    gen_semilegal_into(b, c, &mut res);
    res
}

/// Returns all the legal moves of side `c`
pub fn gen_legal(b: &Board, c: Color) -> MoveList {
    let mut res = MoveList::new();
    gen_legal_into(b, c, &mut res);
    res
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

/// Returns `true` if the piece on `src` has at least one legal move
///
/// Stops as soon as the first legal move is found.
pub fn has_legal_targets(b: &Board, src: Coord) -> bool {
    let color = match piece_color(b, src) {
        Some(color) => color,
        None => return false,
    };
    let mut err_on_first = ErrOnFirst;
    let mut legal = LegalFilter::new(b, color, &mut err_on_first);
    let mut p = OwnColorFilter::new(b, color, &mut legal);
    MoveGenImpl::new(b, &mut p).gen_piece(src).is_err()
}

/// Returns `true` if side `c` has at least one legal move
pub fn has_any_legal_move(b: &Board, c: Color) -> bool {
    let mut err_on_first = ErrOnFirst;
    let mut legal = LegalFilter::new(b, c, &mut err_on_first);
    let mut p = OwnColorFilter::new(b, c, &mut legal);
    MoveGenImpl::new(b, &mut p).gen_side(c).is_err()
}
