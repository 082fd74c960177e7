//! Files, ranks and squares of the playable 8x8 area.
//!
//! Squares also know where they sit in the padded grid of [`Board`](super::board::Board):
//! two rings of "outside" cells surround the playable area so that knight jumps and
//! sliding rays can walk off the board without bounds checks.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the padded grid (8 playable files plus two border files on each side).
pub(crate) const GRID_WIDTH: usize = 12;
/// Number of cells in the padded grid.
pub(crate) const GRID_SIZE: usize = GRID_WIDTH * GRID_WIDTH;
const GRID_BORDER: usize = 2;

/// Files of a chessboard (A-H).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl File {
    /// All files, from A to H.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// A file from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// A file from its letter ('a' to 'h').
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Self::from_index(c as u8 - b'a'),
            _ => None,
        }
    }

    /// The letter of this file.
    #[inline]
    pub fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// The file `delta` files away from this one, if still on the board.
    #[inline]
    pub fn offset(self, delta: i8) -> Option<Self> {
        u8::try_from(self as i8 + delta)
            .ok()
            .and_then(Self::from_index)
    }
}
impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Ranks of a chessboard (1-8).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
}
impl Rank {
    /// All ranks, from 1 to 8.
    pub const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// A rank from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// A rank from its digit ('1' to '8').
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::from_index(c as u8 - b'1'),
            _ => None,
        }
    }

    /// The digit of this rank.
    #[inline]
    pub fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// The rank `delta` ranks away from this one, if still on the board.
    #[inline]
    pub fn offset(self, delta: i8) -> Option<Self> {
        u8::try_from(self as i8 + delta)
            .ok()
            .and_then(Self::from_index)
    }
}
impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A square of the playable area, indexed `8 * rank + file` (a1 = 0, h8 = 63).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);
impl Square {
    /// The square at the intersection of `file` and `rank`.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(rank as u8 * 8 + file as u8)
    }

    /// A square from its `8 * rank + file` index.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        (index < 64).then_some(Self(index))
    }

    /// The `8 * rank + file` index of this square.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    /// The square `files` files and `ranks` ranks away, if still on the board.
    #[inline]
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        Some(Self::new(
            self.file().offset(files)?,
            self.rank().offset(ranks)?,
        ))
    }

    /// Checks if this is a light square (h1 is light, a1 is dark).
    #[inline]
    pub fn is_light(self) -> bool {
        (self.file() as u8 + self.rank() as u8) % 2 == 1
    }

    /// Iterator over all 64 squares, from a1 to h8.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..64).map(Self)
    }

    /// Index of this square in the padded grid.
    #[inline]
    pub(crate) fn grid_index(self) -> usize {
        (self.rank() as usize + GRID_BORDER) * GRID_WIDTH + self.file() as usize + GRID_BORDER
    }

    /// The playable square at a padded grid index, if any.
    #[inline]
    pub(crate) fn from_grid_index(index: isize) -> Option<Self> {
        let index = usize::try_from(index).ok()?;
        let file = (index % GRID_WIDTH).checked_sub(GRID_BORDER)?;
        let rank = (index / GRID_WIDTH).checked_sub(GRID_BORDER)?;
        Some(Self::new(
            File::from_index(u8::try_from(file).ok()?)?,
            Rank::from_index(u8::try_from(rank).ok()?)?,
        ))
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Errors when reading a square from its coordinates.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Error)]
pub enum SquareParseError {
    #[error("square coordinates must be exactly two characters, got {0:?}")]
    InvalidLength(String),
    #[error("{0:?} is not a file")]
    InvalidFile(char),
    #[error("{0:?} is not a rank")]
    InvalidRank(char),
}

impl std::str::FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Self::new(
                File::from_char(file).ok_or(SquareParseError::InvalidFile(file))?,
                Rank::from_char(rank).ok_or(SquareParseError::InvalidRank(rank))?,
            )),
            _ => Err(SquareParseError::InvalidLength(s.to_string())),
        }
    }
}
impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}
