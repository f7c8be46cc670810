//! Game state: side to move, selection, move application and the terminal state
//!
//! [`GameState`] is the controller between the rules engine and whatever view drives it. A
//! typical view first calls [`GameState::select()`] when a piece is clicked, highlights the
//! returned squares and then calls [`GameState::try_move()`] when a destination is clicked.

use crate::bitboard::Bitboard;
use crate::board::{Board, FenParseError, Pretty, PrettyStyle, ValidateError};
use crate::moves::{self, Move};
use crate::types::{Cell, Color, Coord, Outcome, Piece};
use crate::{attack, movegen, outcome};

use std::str::FromStr;

use log::{debug, trace};
use thiserror::Error;

/// Result of a successfully applied move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AppliedMove {
    /// The move itself
    pub mv: Move,
    /// Piece which stood on the destination square, if any
    pub captured: Option<Piece>,
    /// `true` if a pawn was turned into a queen
    pub promote: bool,
}

/// Result of [`GameState::try_move()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveStatus {
    /// The move was applied and the turn passed to the other side
    Applied(AppliedMove),
    /// The move was not applied; the selection is cleared and nothing else changed
    Deselected,
}

impl MoveStatus {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveStatus::Applied(_))
    }
}

/// Error playing a move via [`GameState::play()`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlayError {
    /// The game has already ended
    #[error("game is finished")]
    Finished,
    /// There is no piece of the side to move on the source square
    #[error("no piece of the side to move on {0}")]
    NotOwnPiece(Coord),
    /// The move cannot be made
    #[error("bad move: {0}")]
    Move(#[from] moves::ValidateError),
    /// The move text cannot be parsed
    #[error("cannot parse move: {0}")]
    Parse(#[from] moves::ParseError),
}

/// Error playing a list of moves via [`GameState::play_list()`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot play move #{}: {}", .pos + 1, .source)]
pub struct PlayListError {
    pub pos: usize,
    pub source: PlayError,
}

/// Owned copy of everything a view needs to render the game
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Board contents, indexed by row and then by column
    pub cells: [[Cell; 8]; 8],
    pub turn: Color,
    pub active: bool,
    pub outcome: Option<Outcome>,
    pub selection: Option<Coord>,
    /// Legal destinations of the selected piece
    pub legal_moves: Vec<Coord>,
}

/// State of a single game
///
/// Once the game reaches checkmate or stalemate, it stays there: selections yield no moves and
/// move attempts are rejected.
///
/// # Example
///
/// ```
/// # use kestrel::{Color, Coord, GameState, Outcome};
/// #
/// let mut game = GameState::new();
/// for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
///     let src: Coord = src.parse().unwrap();
///     let dst: Coord = dst.parse().unwrap();
///     assert!(game.select(src).has(dst));
///     assert!(game.try_move(src, dst).is_applied());
/// }
/// assert!(!game.is_active());
/// assert_eq!(game.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Color,
    outcome: Option<Outcome>,
    selection: Option<Coord>,
    legal: Bitboard,
}

impl GameState {
    /// Creates a game in the initial position with White to move
    pub fn new() -> GameState {
        GameState {
            board: Board::initial(),
            turn: Color::White,
            outcome: None,
            selection: None,
            legal: Bitboard::EMPTY,
        }
    }

    /// Creates a game from the board `board` with `turn` to move
    ///
    /// The position may already be terminal; in this case the game is created finished.
    pub fn from_board(board: Board, turn: Color) -> Result<GameState, ValidateError> {
        board.validate()?;
        if attack::is_in_check(&board, turn.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }
        let outcome = outcome::calc_outcome(&board, turn);
        Ok(GameState {
            board,
            turn,
            outcome,
            selection: None,
            legal: Bitboard::EMPTY,
        })
    }

    /// Creates a game from text of the form `<placement> <w|b>`
    ///
    /// `<placement>` is the piece placement part of FEN.
    pub fn from_fen(s: &str) -> Result<GameState, FenParseError> {
        if !s.is_ascii() {
            return Err(FenParseError::NonAscii);
        }
        let mut iter = s.split_ascii_whitespace();
        let board = Board::from_fen(iter.next().ok_or(FenParseError::NoBoard)?)?;
        let turn = Color::from_str(iter.next().ok_or(FenParseError::NoMoveSide)?)?;
        if iter.next().is_some() {
            return Err(FenParseError::ExtraData);
        }
        Ok(GameState::from_board(board, turn)?)
    }

    /// Converts the game into text of the form `<placement> <w|b>`
    pub fn as_fen(&self) -> String {
        format!("{} {}", self.board, self.turn)
    }

    /// Starts a new game from the initial position
    pub fn reset(&mut self) {
        *self = GameState::new();
        debug!("game reset");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns `true` until the game reaches checkmate or stalemate
    #[inline]
    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn selection(&self) -> Option<Coord> {
        self.selection
    }

    /// Legal destinations of the selected piece
    #[inline]
    pub fn legal_moves(&self) -> Bitboard {
        self.legal
    }

    /// Selects the piece on `pos` and returns its legal destinations
    ///
    /// Selecting an empty square or a piece of the side not to move, or selecting anything in a
    /// finished game, clears the selection and returns an empty set.
    pub fn select(&mut self, pos: Coord) -> Bitboard {
        self.deselect();
        if !self.is_active() {
            trace!("select {}: game is finished", pos);
            return Bitboard::EMPTY;
        }
        if self.board.get(pos).color() != Some(self.turn) {
            trace!("select {}: no piece of {}", pos, self.turn.name());
            return Bitboard::EMPTY;
        }
        self.selection = Some(pos);
        self.legal = movegen::legal_targets(&self.board, pos);
        trace!("select {}: {} legal moves", pos, self.legal.len());
        self.legal
    }

    /// Clears the selection
    pub fn deselect(&mut self) {
        self.selection = None;
        self.legal = Bitboard::EMPTY;
    }

    /// Tries to move the selected piece from `src` to `dst`
    ///
    /// The move is applied only if the game is active, `src` is the current selection and `dst`
    /// is among its legal destinations. Otherwise the selection is cleared and the attempt is
    /// reported as [`MoveStatus::Deselected`]. After the move the turn passes to the other side
    /// and the terminal state is recomputed.
    pub fn try_move(&mut self, src: Coord, dst: Coord) -> MoveStatus {
        let accepted =
            self.is_active() && self.selection == Some(src) && self.legal.has(dst);
        if !accepted {
            trace!("move {}{} rejected, deselecting", src, dst);
            self.deselect();
            return MoveStatus::Deselected;
        }
        MoveStatus::Applied(self.apply(Move::new(src, dst)))
    }

    /// Plays the move `mv` without going through the selection
    ///
    /// Unlike [`GameState::try_move()`], the reason of the failure is reported, and the
    /// selection is left intact on failure.
    pub fn play(&mut self, mv: Move) -> Result<AppliedMove, PlayError> {
        if !self.is_active() {
            return Err(PlayError::Finished);
        }
        if self.board.get(mv.src()).color() != Some(self.turn) {
            return Err(PlayError::NotOwnPiece(mv.src()));
        }
        mv.validate(&self.board)?;
        Ok(self.apply(mv))
    }

    /// Parses the move from text like `e2e4` and plays it
    pub fn play_str(&mut self, s: &str) -> Result<AppliedMove, PlayError> {
        self.play(Move::from_str(s)?)
    }

    /// Plays space-separated moves in `e2e4` form one by one
    ///
    /// If one of the moves fails, the moves before it remain applied.
    pub fn play_list(&mut self, list: &str) -> Result<(), PlayListError> {
        for (pos, s) in list.split_ascii_whitespace().enumerate() {
            self.play_str(s)
                .map_err(|source| PlayListError { pos, source })?;
        }
        Ok(())
    }

    fn apply(&mut self, mv: Move) -> AppliedMove {
        let u = moves::make_move(&mut self.board, mv);
        let applied = AppliedMove {
            mv,
            captured: u.dst_cell().piece(),
            promote: u.is_promote(mv),
        };
        debug!(
            "{} plays {} (captured: {:?}, promote: {})",
            self.turn.name(),
            mv,
            applied.captured,
            applied.promote
        );

        self.deselect();
        self.turn = self.turn.inv();
        self.outcome = outcome::calc_outcome(&self.board, self.turn);
        if let Some(outcome) = self.outcome {
            debug!("game over: {}", outcome);
        }
        applied
    }

    /// Returns an owned copy of the state for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.board.rows(),
            turn: self.turn,
            active: self.is_active(),
            outcome: self.outcome,
            selection: self.selection,
            legal_moves: self.legal.iter().collect(),
        }
    }

    /// Wraps the board to pretty-print it, with the side to move shown in the corner
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.board.pretty(style, Some(self.turn))
    }
}

impl Default for GameState {
    #[inline]
    fn default() -> GameState {
        GameState::new()
    }
}
