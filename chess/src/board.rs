//! Board and related things

use crate::bitboard::Bitboard;
use crate::types::{Cell, Color, ColorParseError, Coord, File, Outcome, Piece, Rank};
use crate::{attack, geometry, outcome};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// The side which just moved has left its king in check
    ///
    /// Only reported when the side to move is known, see
    /// [`GameState::from_board()`](crate::game::GameState::from_board).
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the piece placement part of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing a position from FEN-like text
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// Text contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// Text doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing piece placement
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// Text doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side
    #[error("bad move side: {0}")]
    MoveSide(#[from] ColorParseError),
    /// Text contains extra data
    #[error("extra data in FEN")]
    ExtraData,
    /// Text was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Chess board
///
/// The board is a plain 8x8 grid of [`Cell`]s. It knows nothing about the side to move; that
/// belongs to [`GameState`](crate::game::GameState).
///
/// Row 0 is the Black back rank ([`Rank::R8`]) and row 7 is the White back rank ([`Rank::R1`]).
///
/// Cloning a board yields a fully independent copy, so a clone can be freely mutated to
/// simulate hypothetical moves.
///
/// # Example
///
/// ```
/// # use kestrel::{Board, Cell, Color, Coord, Piece};
/// #
/// let mut board = Board::empty();
/// board.put("b2".parse().unwrap(), Cell::from_parts(Color::White, Piece::King));
/// board.put("d5".parse().unwrap(), Cell::from_parts(Color::Black, Piece::King));
/// assert_eq!(board.as_fen(), "8/8/8/3k4/8/8/1K6/8");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; 64],
}

impl Board {
    /// Returns an empty board
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for color in [Color::White, Color::Black] {
            let rank = geometry::back_rank(color);
            let pawn_rank = geometry::pawn_home_rank(color);
            for (file, piece) in File::iter().zip([
                Piece::Rook,
                Piece::Knight,
                Piece::Bishop,
                Piece::Queen,
                Piece::King,
                Piece::Bishop,
                Piece::Knight,
                Piece::Rook,
            ]) {
                res.put2(file, rank, Cell::from_parts(color, piece));
                res.put2(file, pawn_rank, Cell::from_parts(color, Piece::Pawn));
            }
        }
        res
    }

    /// Repopulates the board with the initial position
    pub fn reset(&mut self) {
        *self = Board::initial();
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// The resulting board is validated with [`Board::validate()`].
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `cell` to the square with coordinate `c`, overwriting its previous contents
    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Puts `cell` to the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Makes the square with coordinate `c` empty
    #[inline]
    pub fn clear(&mut self, c: Coord) {
        self.put(c, Cell::EMPTY);
    }

    /// Returns the board as an 8x8 grid, indexed by row and then by column
    pub fn rows(&self) -> [[Cell; 8]; 8] {
        let mut res = [[Cell::EMPTY; 8]; 8];
        for coord in Coord::iter() {
            res[coord.row()][coord.col()] = self.get(coord);
        }
        res
    }

    /// Returns the set of squares occupied by pieces of color `c`
    pub fn color(&self, c: Color) -> Bitboard {
        Coord::iter()
            .filter(|&coord| self.get(coord).color() == Some(c))
            .collect()
    }

    /// Iterates over all the pieces of color `c` together with their coordinates
    pub fn pieces(&self, c: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |coord| match self.get(coord).parts() {
            Some((color, piece)) if color == c => Some((coord, piece)),
            _ => None,
        })
    }

    /// Returns the position of the king of color `c`, or `None` if there is no such king
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        let king = Cell::from_parts(c, Piece::King);
        Coord::iter().find(|&coord| self.get(coord) == king)
    }

    /// Checks that the board contains a sane position
    pub fn validate(&self) -> Result<(), ValidateError> {
        for color in [Color::White, Color::Black] {
            if self.color(color).len() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            let kings = self
                .pieces(color)
                .filter(|&(_, piece)| piece == Piece::King)
                .count();
            match kings {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        let back_ranks = Bitboard::from_rank(Rank::R1) | Bitboard::from_rank(Rank::R8);
        if let Some(pawn) = back_ranks
            .into_iter()
            .find(|&coord| self.get(coord).piece() == Some(Piece::Pawn))
        {
            return Err(ValidateError::InvalidPawn(pawn));
        }

        Ok(())
    }

    /// Returns `true` if the king of color `c` is in check
    ///
    /// # Panics
    ///
    /// Panics if there is no king of color `c` on the board.
    #[inline]
    pub fn is_in_check(&self, c: Color) -> bool {
        attack::is_in_check(self, c)
    }

    /// Returns `true` if color `c` has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self, c: Color) -> bool {
        outcome::has_any_legal_move(self, c)
    }

    /// Returns `true` if color `c` is checkmated
    #[inline]
    pub fn is_checkmate(&self, c: Color) -> bool {
        outcome::is_checkmate(self, c)
    }

    /// Returns `true` if color `c` is stalemated
    #[inline]
    pub fn is_stalemate(&self, c: Color) -> bool {
        outcome::is_stalemate(self, c)
    }

    /// Calculates the outcome of the position if `side` is to move
    ///
    /// This function can be computationally expensive, as it needs to find whether `side` has any
    /// legal move.
    #[inline]
    pub fn calc_outcome(&self, side: Color) -> Option<Outcome> {
        outcome::calc_outcome(self, side)
    }

    /// Wraps the board to allow pretty-printing with the given style `style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`. If `side` is given, it is shown in the
    /// lower left corner.
    ///
    /// # Example
    ///
    /// ```
    /// # use kestrel::{Board, Color, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii, Some(Color::White)).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle, side: Option<Color>) -> Pretty<'_> {
        Pretty {
            board: self,
            side,
            style,
        }
    }

    /// Converts the board into the piece placement part of FEN
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Board({})", self)
    }
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] = Cell::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        if !s.is_ascii() {
            return Err(FenParseError::NonAscii);
        }
        if s.is_empty() {
            return Err(FenParseError::NoBoard);
        }
        let board = Board {
            cells: parse_cells(s)?,
        };
        board.validate()?;
        Ok(board)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let cell = self.get2(file, rank);
                if cell.is_free() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", cell)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    side: Option<Color>,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const WHITE_INDICATOR: char;
    const BLACK_INDICATOR: char;

    fn cell(c: Cell) -> char;

    fn indicator(c: Option<Color>) -> char {
        match c {
            Some(Color::White) => Self::WHITE_INDICATOR,
            Some(Color::Black) => Self::BLACK_INDICATOR,
            None => ' ',
        }
    }

    fn fmt(b: &Board, side: Option<Color>, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(side), Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const WHITE_INDICATOR: char = 'W';
    const BLACK_INDICATOR: char = 'B';

    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const WHITE_INDICATOR: char = '○';
    const BLACK_INDICATOR: char = '●';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, self.side, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, self.side, f),
        }
    }
}
