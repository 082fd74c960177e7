//! Material census of a position: how many pieces of each kind each side has, and on
//! which square colours its bishops stand.

use super::{
    board::Board,
    colour::{Colour, NUM_COLOURS},
    piece::{PieceKind, NUM_PIECES},
};

/// Piece counts of a standard starting side, indexed by [`PieceKind`].
const STANDARD_COUNTS: [u8; NUM_PIECES] = [8, 2, 2, 2, 1, 1];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialCensus {
    counts: [[u8; NUM_PIECES]; NUM_COLOURS],
    light_bishops: [u8; NUM_COLOURS],
    dark_bishops: [u8; NUM_COLOURS],
}
impl MaterialCensus {
    /// Counts the material on a board.
    pub fn of(board: &Board) -> Self {
        let mut census = Self::default();
        for (square, piece) in board.pieces() {
            let colour = piece.colour as usize;
            census.counts[colour][piece.kind as usize] += 1;
            if piece.kind == PieceKind::Bishop {
                if square.is_light() {
                    census.light_bishops[colour] += 1
                } else {
                    census.dark_bishops[colour] += 1
                }
            }
        }
        census
    }

    /// The census of the standard starting position.
    pub fn standard() -> Self {
        Self {
            counts: [STANDARD_COUNTS; NUM_COLOURS],
            light_bishops: [1; NUM_COLOURS],
            dark_bishops: [1; NUM_COLOURS],
        }
    }

    /// Number of `kind` pieces of the given colour.
    #[inline]
    pub fn count(&self, colour: Colour, kind: PieceKind) -> u8 {
        self.counts[colour as usize][kind as usize]
    }

    /// Number of bishops of the given colour standing on light squares.
    #[inline]
    pub fn light_bishops(&self, colour: Colour) -> u8 {
        self.light_bishops[colour as usize]
    }

    /// Number of bishops of the given colour standing on dark squares.
    #[inline]
    pub fn dark_bishops(&self, colour: Colour) -> u8 {
        self.dark_bishops[colour as usize]
    }

    /// Number of knights and bishops of the given colour.
    #[inline]
    pub fn minor_pieces(&self, colour: Colour) -> u8 {
        self.count(colour, PieceKind::Knight) + self.count(colour, PieceKind::Bishop)
    }

    /// Checks if neither side can possibly mate: bare kings, a single minor piece
    /// against a bare king, or one bishop each on squares of the same colour.
    ///
    /// # Example
    /// ```
    /// # use paddock::chess::{Board, MaterialCensus};
    /// let bare_kings = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    /// assert!(MaterialCensus::of(&bare_kings).is_insufficient());
    /// assert!(!MaterialCensus::standard().is_insufficient());
    /// ```
    pub fn is_insufficient(&self) -> bool {
        let heavy = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
        if Colour::BOTH
            .into_iter()
            .any(|colour| heavy.iter().any(|&kind| self.count(colour, kind) > 0))
        {
            return false;
        }
        match (
            self.minor_pieces(Colour::White),
            self.minor_pieces(Colour::Black),
        ) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (1, 1) => {
                self.count(Colour::White, PieceKind::Bishop) == 1
                    && self.count(Colour::Black, PieceKind::Bishop) == 1
                    && self.light_bishops(Colour::White) == self.light_bishops(Colour::Black)
            }
            _ => false,
        }
    }

    /// Checks if the piece counts differ from those of the standard starting
    /// position.
    pub fn has_material_odds(&self) -> bool {
        self.counts != Self::standard().counts
    }
}
