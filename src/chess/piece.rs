//! Piece types encoding.

use serde::{Deserialize, Serialize};

use super::colour::Colour;

/// Total number of different piece kinds (6).
pub const NUM_PIECES: usize = 6;

const PIECE_SYMBOLS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

/// Complete set of information for identifying a piece (colour and kind).
///
/// Pieces are written with their FEN symbol: 'p', 'n', 'b', 'r', 'q', 'k' for black,
/// uppercase for white.
/// ```
/// # use paddock::chess::piece::*;
/// # use paddock::chess::colour::*;
/// assert_eq!(Piece::from_symbol('p'), Some(Piece::new(PieceKind::Pawn, Colour::Black)));
/// assert_eq!(Piece::new(PieceKind::Queen, Colour::White).symbol(), 'Q');
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}
impl Piece {
    /// Creates a new `kind` piece of the given `colour`.
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// Returns the piece's FEN symbol.
    pub fn symbol(&self) -> char {
        PIECE_SYMBOLS[self.colour as usize * NUM_PIECES + self.kind as usize]
    }

    /// Reads a FEN piece symbol, case giving the colour.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let kind = PieceKind::from_letter(symbol)?;
        Some(Self::new(kind, (!symbol.is_ascii_uppercase()).into()))
    }
}
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}
impl PieceKind {
    /// All piece kinds.
    pub const PIECE_KINDS: [Self; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Checks if this piece kind is a diagonal slider (bishops and queens).
    #[inline(always)]
    pub fn is_diagonal_slider(self) -> bool {
        matches!(self, Self::Bishop | Self::Queen)
    }
    /// Checks if this piece kind is an orthogonal slider (rooks and queens).
    #[inline(always)]
    pub fn is_orthogonal_slider(self) -> bool {
        matches!(self, Self::Rook | Self::Queen)
    }

    /// Checks if this piece kind can be promoted to.
    ///
    /// Returns true for all pieces but pawns and kings.
    pub fn is_valid_promotion_target(&self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }

    /// Iterator over all piece kinds.
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::PIECE_KINDS.into_iter()
    }

    /// Reads a piece letter regardless of its case.
    pub fn from_letter(letter: char) -> Option<Self> {
        Some(match letter.to_ascii_lowercase() {
            'p' => Self::Pawn,
            'n' => Self::Knight,
            'b' => Self::Bishop,
            'r' => Self::Rook,
            'q' => Self::Queen,
            'k' => Self::King,
            _ => return None,
        })
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PIECE_SYMBOLS[*self as usize])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbols_carry_colour() {
        for kind in PieceKind::iter() {
            for colour in Colour::BOTH {
                let piece = Piece::new(kind, colour);
                assert_eq!(Piece::from_symbol(piece.symbol()), Some(piece));
            }
        }
        assert_eq!(Piece::from_symbol('x'), None);
    }

    #[test]
    fn sliders() {
        assert!(PieceKind::Queen.is_diagonal_slider() && PieceKind::Queen.is_orthogonal_slider());
        assert!(PieceKind::Bishop.is_diagonal_slider() && !PieceKind::Bishop.is_orthogonal_slider());
        assert!(!PieceKind::Knight.is_diagonal_slider() && !PieceKind::King.is_orthogonal_slider());
    }
}
