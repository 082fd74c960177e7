//! Main representation of a chess position.
//!
//! The 8x8 playable area is embedded in a padded 12x12 grid whose border cells hold
//! [`Cell::Outside`], so piece geometry can walk off the board and stop there instead
//! of checking bounds.

use super::{
    castling_rights::{CastlingRights, CastlingSide},
    colour::{Colour, NUM_COLOURS},
    piece::{Piece, PieceKind},
    square::{File, Rank, Square, GRID_SIZE},
};

/// Content of a single cell of the padded grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cell {
    /// Border cell, never part of the playable area.
    Outside,
    Empty,
    Occupied(Piece),
}
impl Cell {
    /// The piece in this cell, if any.
    #[inline]
    pub fn piece(self) -> Option<Piece> {
        match self {
            Self::Occupied(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    #[inline]
    pub fn is_outside(self) -> bool {
        self == Self::Outside
    }
}
impl From<Option<Piece>> for Cell {
    fn from(piece: Option<Piece>) -> Self {
        piece.map_or(Self::Empty, Self::Occupied)
    }
}

const STANDARD_BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess position: piece placement and the metadata needed to continue a game
/// from it.
///
/// Boards are plain values: copying one yields a fully independent position, which is
/// how speculative moves are tried.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) cells: [Cell; GRID_SIZE],
    pub(crate) side_to_move: Colour,
    pub(crate) move_number: u16,
    pub(crate) castling_rights: CastlingRights,
    // Cached king locations, refreshed whenever a king is placed or removed.
    pub(crate) kings: [Option<Square>; NUM_COLOURS],
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
}

/// Every mutable field of a [`Board`], captured at once by [`Board::save_state`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoardState(Board);

impl Default for Board {
    /// A position with no pieces, White to move.
    fn default() -> Self {
        let mut cells = [Cell::Outside; GRID_SIZE];
        for square in Square::iter() {
            cells[square.grid_index()] = Cell::Empty;
        }
        Self {
            cells,
            side_to_move: Colour::White,
            move_number: 1,
            castling_rights: CastlingRights::none(),
            kings: [None; NUM_COLOURS],
            en_passant: None,
            halfmove_clock: 0,
        }
    }
}
impl Board {
    /// A position with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for colour in Colour::BOTH {
            for (file, kind) in File::ALL.into_iter().zip(STANDARD_BACK_RANK) {
                board.put(
                    Square::new(file, colour.home_rank()),
                    Some(Piece::new(kind, colour)),
                );
                board.put(
                    Square::new(file, colour.pawn_rank()),
                    Some(Piece::new(PieceKind::Pawn, colour)),
                );
            }
        }
        board.castling_rights = CastlingRights::standard();
        board
    }

    /// Returns the cell at the given coordinates ('a'..'h', '1'..'8'), or
    /// [`Cell::Outside`] if they do not name a square.
    pub fn get(&self, file: char, rank: char) -> Cell {
        match (File::from_char(file), Rank::from_char(rank)) {
            (Some(file), Some(rank)) => self.cell(Square::new(file, rank)),
            _ => Cell::Outside,
        }
    }

    /// Writes a cell at the given coordinates ('a'..'h', '1'..'8').
    ///
    /// Returns `false`, leaving the board untouched, if the coordinates do not name a
    /// square or if `cell` is [`Cell::Outside`].
    pub fn set(&mut self, file: char, rank: char, cell: Cell) -> bool {
        match (File::from_char(file), Rank::from_char(rank), cell) {
            (_, _, Cell::Outside) => false,
            (Some(file), Some(rank), cell) => {
                self.put(Square::new(file, rank), cell.piece());
                true
            }
            _ => false,
        }
    }

    /// Returns the cell of a given square.
    #[inline]
    pub fn cell(&self, square: Square) -> Cell {
        self.cells[square.grid_index()]
    }

    /// Returns the piece sitting on a given square if any.
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.cell(square).piece()
    }

    /// Cell at a raw padded grid index, out of range reading as outside.
    #[inline]
    pub(crate) fn grid_cell(&self, index: isize) -> Cell {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.cells.get(index))
            .copied()
            .unwrap_or(Cell::Outside)
    }

    /// Places (or removes, with `None`) a piece on a square, keeping the king cache
    /// current.
    pub fn put(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(old) = self.piece_on(square) {
            if old.kind == PieceKind::King && self.kings[old.colour as usize] == Some(square) {
                self.kings[old.colour as usize] = None
            }
        }
        if let Some(new) = piece {
            if new.kind == PieceKind::King {
                self.kings[new.colour as usize] = Some(square)
            }
        }
        self.cells[square.grid_index()] = piece.into();
    }

    /// Iterator over all pieces on the board, from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| Some((square, self.piece_on(square)?)))
    }

    /// Returns the current side to move.
    #[inline]
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, colour: Colour) {
        self.side_to_move = colour
    }

    /// Number of the current full move, incremented after each Black move.
    #[inline]
    pub fn move_number(&self) -> u16 {
        self.move_number
    }

    /// Number of plies since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    pub fn castling_rights_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling_rights
    }

    /// Square a pawn may capture en passant on this move, if the last move was a double
    /// pawn push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the square of the king of the given colour, from the cache when it is
    /// set and from a full scan otherwise.
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.kings[colour as usize].or_else(|| {
            let king = Piece::new(PieceKind::King, colour);
            self.pieces()
                .find_map(|(square, piece)| (piece == king).then_some(square))
        })
    }

    /// File of the outermost rook of `colour` on its home rank, on the `side` of its
    /// king.
    pub(crate) fn outermost_rook(&self, colour: Colour, side: CastlingSide) -> Option<File> {
        let rank = colour.home_rank();
        let king_file = self
            .king_square(colour)
            .filter(|king| king.rank() == rank)
            .map_or(File::E, Square::file);
        let rook = Some(Piece::new(PieceKind::Rook, colour));
        let is_rook = |file: &File| self.piece_on(Square::new(*file, rank)) == rook;
        match side {
            CastlingSide::Kingside => File::ALL
                .into_iter()
                .rev()
                .take_while(|file| *file > king_file)
                .find(is_rook),
            CastlingSide::Queenside => File::ALL
                .into_iter()
                .take_while(|file| *file < king_file)
                .find(is_rook),
        }
    }

    /// Captures every mutable field of the board.
    pub fn save_state(&self) -> BoardState {
        BoardState(*self)
    }

    /// Restores a state captured by [`Board::save_state`].
    pub fn restore_state(&mut self, state: BoardState) {
        *self = state.0
    }

    /// Hands the turn over, counting a new full move after Black played.
    pub(crate) fn finish_turn(&mut self) {
        if self.side_to_move.is_black() {
            self.move_number = self.move_number.saturating_add(1)
        }
        self.side_to_move.invert()
    }
}
impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::ALL {
                match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }
            match rank {
                Rank::Eight => writeln!(f, "   side to move: {}", self.side_to_move),
                Rank::Seven => writeln!(f, "   move: {}", self.move_number),
                Rank::Six => writeln!(f, "   halfmove clock: {}", self.halfmove_clock),
                Rank::Five => writeln!(
                    f,
                    "   castling: {}",
                    self.castling_rights.shredder_notation()
                ),
                Rank::Four => writeln!(
                    f,
                    "   en passant: {}",
                    self.en_passant
                        .map_or_else(|| "-".to_string(), |square| square.to_string())
                ),
                _ => writeln!(f),
            }?
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "fen: {}", self.fen())
    }
}
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
