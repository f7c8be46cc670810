//! Chess rules engine
//!
//! The engine works on a plain 8x8 board and knows about piece movement, checks, checkmate and
//! stalemate. Castling, en passant, underpromotion and draw rules other than stalemate are not
//! supported; a pawn reaching the last rank always becomes a queen.
//!
//! The game itself is driven by [`GameState`], which tracks the side to move, the selected piece
//! and the terminal state.
//!
//! # Example
//!
//! ```
//! use kestrel::{Color, Coord, GameState, MoveStatus};
//!
//! let mut game = GameState::new();
//! let e2: Coord = "e2".parse().unwrap();
//! let e4: Coord = "e4".parse().unwrap();
//!
//! let targets = game.select(e2);
//! assert_eq!(targets.len(), 2);
//! assert!(matches!(game.try_move(e2, e4), MoveStatus::Applied(_)));
//! assert_eq!(game.turn(), Color::Black);
//! ```

pub mod attack;
pub mod board;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod outcome;

pub use kestrel_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::Board;
pub use game::{GameState, MoveStatus, Snapshot};
pub use movegen::MoveList;
pub use moves::Move;
pub use types::{Cell, Color, Coord, File, Outcome, OutcomeKind, Piece, Rank};
