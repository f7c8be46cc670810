use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellParseError {
    #[error("unexpected cell char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

/// Board column, from `a` (column 0) to `h` (column 7)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(Self::from_index((u32::from(c) - u32::from('a')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board row
///
/// Rows are numbered from the Black side: row 0 is [`Rank::R8`], the Black back rank,
/// and row 7 is [`Rank::R1`], the White back rank.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    const ALL: [Rank; 8] = [
        Rank::R8,
        Rank::R7,
        Rank::R6,
        Rank::R5,
        Rank::R4,
        Rank::R3,
        Rank::R2,
        Rank::R1,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        Self::ALL[val]
    }

    /// Iterates over the ranks from row 0 ([`Rank::R8`]) to row 7 ([`Rank::R1`])
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Self::from_index((u32::from('8') - u32::from(c)) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board, addressed either as `(row, col)` or as `(file, rank)`
///
/// The index of a coordinate is `row * 8 + col`, so `a8` has index 0 and `h1` has index 63.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord must be between 0 and 63");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord(((rank as u8) << 3) | file as u8)
    }

    /// Creates a coordinate from row and column, returning `None` if either is out of bounds
    pub const fn new(row: usize, col: usize) -> Option<Coord> {
        if row >= 8 || col >= 8 {
            return None;
        }
        Some(Coord(((row as u8) << 3) | col as u8))
    }

    pub const fn file(&self) -> File {
        File::from_index(self.col())
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.row())
    }

    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    pub const fn col(&self) -> usize {
        (self.0 & 7) as usize
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Moves the coordinate by `d_row` rows and `d_col` columns
    ///
    /// Returns `None` if the resulting square lies outside the board.
    pub fn try_shift(self, d_row: isize, d_col: isize) -> Option<Coord> {
        let row = self.row().wrapping_add(d_row as usize);
        let col = self.col().wrapping_add(d_col as usize);
        Coord::new(row, col)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Coord({})", self);
        }
        write!(f, "Coord(?{:?})", self.0)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(CoordParseError::BadLength),
        };
        Ok(Coord::from_parts(
            File::from_char(file_ch).ok_or(CoordParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(CoordParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch)),
            _ => Err(ColorParseError::BadLength),
        }
    }
}

/// Kind of a chess piece, regardless of its color
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    King = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl Piece {
    pub const COUNT: usize = 6;

    const ALL: [Piece; Self::COUNT] = [
        Piece::Pawn,
        Piece::King,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn as_char(&self) -> char {
        b"PKNBRQ"[self.index()] as char
    }

    pub fn from_char(c: char) -> Option<Piece> {
        match c {
            'P' => Some(Piece::Pawn),
            'K' => Some(Piece::King),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            _ => None,
        }
    }
}

/// Contents of a single square: either empty, or a piece of some color
///
/// Color and piece kind can be queried independently via [`Cell::color()`] and [`Cell::piece()`].
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(Option<(Color, Piece)>);

impl Cell {
    pub const EMPTY: Cell = Cell(None);
    pub const COUNT: usize = 1 + 2 * Piece::COUNT;

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell(Some((c, p)))
    }

    pub const fn is_free(&self) -> bool {
        self.0.is_none()
    }

    pub const fn is_occupied(&self) -> bool {
        self.0.is_some()
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            Some((c, _)) => Some(c),
            None => None,
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        match self.0 {
            Some((_, p)) => Some(p),
            None => None,
        }
    }

    pub const fn parts(&self) -> Option<(Color, Piece)> {
        self.0
    }

    /// Iterates over all the possible cells, starting from the empty one
    pub fn iter() -> impl Iterator<Item = Self> {
        let white = Piece::iter().map(|p| Cell::from_parts(Color::White, p));
        let black = Piece::iter().map(|p| Cell::from_parts(Color::Black, p));
        [Cell::EMPTY].into_iter().chain(white).chain(black)
    }

    pub fn as_char(&self) -> char {
        match self.0 {
            None => '.',
            Some((Color::White, p)) => p.as_char(),
            Some((Color::Black, p)) => p.as_char().to_ascii_lowercase(),
        }
    }

    pub fn as_utf8_char(&self) -> char {
        const WHITE: [char; Piece::COUNT] = ['♙', '♔', '♘', '♗', '♖', '♕'];
        const BLACK: [char; Piece::COUNT] = ['♟', '♚', '♞', '♝', '♜', '♛'];
        match self.0 {
            None => '.',
            Some((Color::White, p)) => WHITE[p.index()],
            Some((Color::Black, p)) => BLACK[p.index()],
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::EMPTY);
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = Piece::from_char(c.to_ascii_uppercase())?;
        Some(Cell::from_parts(color, piece))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Cell({})", self.as_char())
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Cell::from_char(ch).ok_or(CellParseError::UnexpectedChar(ch)),
            _ => Err(CellParseError::BadLength),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    Checkmate,
    Stalemate,
}

/// Terminal result of a game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The side to move is in check and has no legal moves; `winner` is the side that delivered mate
    Checkmate { winner: Color },
    /// The side to move is not in check, but has no legal moves
    Stalemate,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Checkmate { .. } => OutcomeKind::Checkmate,
            Self::Stalemate => OutcomeKind::Stalemate,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } => Some(*winner),
            Self::Stalemate => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{Cell, Coord};
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    impl Serialize for Coord {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Coord {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = String::deserialize(d)?;
            s.parse().map_err(de::Error::custom)
        }
    }

    impl Serialize for Cell {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_char(self.as_char())
        }
    }

    impl<'de> Deserialize<'de> for Cell {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let c = char::deserialize(d)?;
            Cell::from_char(c).ok_or_else(|| de::Error::custom(format!("bad cell char {:?}", c)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file() {
        for (idx, file) in File::iter().enumerate() {
            assert_eq!(file.index(), idx);
            assert_eq!(File::from_index(idx), file);
        }
    }

    #[test]
    fn test_rank() {
        for (idx, rank) in Rank::iter().enumerate() {
            assert_eq!(rank.index(), idx);
            assert_eq!(Rank::from_index(idx), rank);
        }
        assert_eq!(Rank::R8.as_char(), '8');
        assert_eq!(Rank::R1.as_char(), '1');
    }

    #[test]
    fn test_coord() {
        let mut coords = Vec::new();
        for rank in Rank::iter() {
            for file in File::iter() {
                let coord = Coord::from_parts(file, rank);
                assert_eq!(coord.file(), file);
                assert_eq!(coord.rank(), rank);
                assert_eq!(Coord::new(coord.row(), coord.col()), Some(coord));
                coords.push(coord);
            }
        }
        assert_eq!(coords, Coord::iter().collect::<Vec<_>>());

        assert_eq!(Coord::new(0, 0), Some(Coord::from_parts(File::A, Rank::R8)));
        assert_eq!(Coord::new(7, 4), Some(Coord::from_parts(File::E, Rank::R1)));
        assert_eq!(Coord::new(8, 0), None);
        assert_eq!(Coord::new(0, 8), None);
    }

    #[test]
    fn test_try_shift() {
        let a8 = Coord::from_parts(File::A, Rank::R8);
        assert_eq!(a8.try_shift(-1, 0), None);
        assert_eq!(a8.try_shift(0, -1), None);
        assert_eq!(a8.try_shift(1, 2), Some(Coord::from_parts(File::C, Rank::R7)));

        let h1 = Coord::from_parts(File::H, Rank::R1);
        assert_eq!(h1.try_shift(1, 0), None);
        assert_eq!(h1.try_shift(0, 1), None);
        assert_eq!(h1.try_shift(-7, -7), Some(a8));
        assert_eq!(h1.try_shift(-8, 0), None);
    }

    #[test]
    fn test_cell() {
        assert_eq!(Cell::EMPTY.color(), None);
        assert_eq!(Cell::EMPTY.piece(), None);
        assert!(Cell::EMPTY.is_free());
        let mut cells = vec![Cell::EMPTY];
        for color in [Color::White, Color::Black] {
            for piece in Piece::iter() {
                let cell = Cell::from_parts(color, piece);
                assert_eq!(cell.color(), Some(color));
                assert_eq!(cell.piece(), Some(piece));
                assert!(cell.is_occupied());
                cells.push(cell);
            }
        }
        assert_eq!(cells, Cell::iter().collect::<Vec<_>>());
        assert_eq!(cells.len(), Cell::COUNT);
    }

    #[test]
    fn test_coord_str() {
        assert_eq!(Coord::from_parts(File::B, Rank::R4).to_string(), "b4");
        assert_eq!(Coord::from_parts(File::A, Rank::R1).to_string(), "a1");
        assert_eq!(
            Coord::from_str("a1"),
            Ok(Coord::from_parts(File::A, Rank::R1))
        );
        assert_eq!(Coord::from_str("e8"), Ok(Coord::new(0, 4).unwrap()));
        assert_eq!(
            Coord::from_str("h9"),
            Err(CoordParseError::UnexpectedRankChar('9'))
        );
        assert_eq!(
            Coord::from_str("i4"),
            Err(CoordParseError::UnexpectedFileChar('i'))
        );
        assert_eq!(Coord::from_str("e44"), Err(CoordParseError::BadLength));
        assert_eq!(Coord::from_str(""), Err(CoordParseError::BadLength));
    }

    #[test]
    fn test_cell_str() {
        for cell in Cell::iter() {
            let s = cell.to_string();
            assert_eq!(Cell::from_str(&s), Ok(cell));
        }
        assert_eq!(Cell::from_str("x"), Err(CellParseError::UnexpectedChar('x')));
        assert_eq!(Cell::from_str("PP"), Err(CellParseError::BadLength));
    }

    #[test]
    fn test_color() {
        assert_eq!(Color::White.inv(), Color::Black);
        assert_eq!(Color::Black.inv(), Color::White);
        assert_eq!(Color::from_str("w"), Ok(Color::White));
        assert_eq!(Color::from_str("b"), Ok(Color::Black));
        assert_eq!(Color::from_str("x"), Err(ColorParseError::UnexpectedChar('x')));
        assert_eq!(Color::from_str("wb"), Err(ColorParseError::BadLength));
    }

    #[test]
    fn test_outcome() {
        let mate = Outcome::Checkmate {
            winner: Color::Black,
        };
        assert_eq!(mate.kind(), OutcomeKind::Checkmate);
        assert_eq!(mate.winner(), Some(Color::Black));
        assert_eq!(mate.to_string(), "checkmate, Black wins");
        assert_eq!(Outcome::Stalemate.kind(), OutcomeKind::Stalemate);
        assert_eq!(Outcome::Stalemate.winner(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let e4 = Coord::from_parts(File::E, Rank::R4);
        assert_eq!(serde_json::to_string(&e4).unwrap(), "\"e4\"");
        assert_eq!(serde_json::from_str::<Coord>("\"e4\"").unwrap(), e4);

        let cell = Cell::from_parts(Color::Black, Piece::Knight);
        assert_eq!(serde_json::to_string(&cell).unwrap(), "\"n\"");
        assert_eq!(serde_json::from_str::<Cell>("\"n\"").unwrap(), cell);
        assert!(serde_json::from_str::<Cell>("\"x\"").is_err());
    }
}
