//! Legal move existence, by copy-and-test: every pseudo-legal destination of every
//! piece is tried on a copy of the board, keeping it only if the mover's king is safe
//! afterwards.
//!
//! Castling counts too. In Chess960 it can be the only legal move, for instance when the
//! king already stands on its target square.

use super::{
    attacks::{DIAGONAL_OFFSETS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_OFFSETS},
    board::{Board, Cell},
    castling_rights::CastlingSide,
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{File, Square, GRID_WIDTH},
};

/// Pseudo-legal destinations of a single piece. A queen in the middle of an empty board
/// reaches 27 squares.
type Targets = heapless::Vec<Square, 28>;

impl Board {
    /// Checks if the given side has at least one legal move.
    pub fn has_legal_moves(&self, colour: Colour) -> bool {
        self.pieces()
            .filter(|(_, piece)| piece.colour == colour)
            .any(|(origin, piece)| {
                self.candidate_targets(origin, piece)
                    .into_iter()
                    .any(|target| self.leaves_king_safe(origin, target, colour))
            })
            || CastlingSide::BOTH
                .into_iter()
                .any(|side| self.can_castle(colour, side))
    }

    /// Checks if the side to move is checkmated.
    ///
    /// # Example
    /// ```
    /// # use paddock::chess::Board;
    /// let fools_mate =
    ///     Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
    ///         .unwrap();
    /// assert!(fools_mate.is_checkmate());
    /// assert!(!fools_mate.is_stalemate());
    /// ```
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && !self.has_legal_moves(self.side_to_move)
    }

    /// Checks if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move) && !self.has_legal_moves(self.side_to_move)
    }

    /// Plays the piece on `origin` to `target` on a copy of the board and checks that
    /// the king of `colour` is not attacked afterwards.
    pub(crate) fn leaves_king_safe(&self, origin: Square, target: Square, colour: Colour) -> bool {
        let Some(piece) = self.piece_on(origin) else {
            return false;
        };
        let mut copy = *self;
        if piece.kind == PieceKind::Pawn
            && origin.file() != target.file()
            && copy.cell(target).is_empty()
            && copy.en_passant == Some(target)
        {
            copy.put(Square::new(target.file(), origin.rank()), None)
        }
        copy.put(origin, None);
        copy.put(target, Some(piece));
        !copy.is_in_check(colour)
    }

    /// Checks if `colour` may castle on `side` with the rook its castling right names.
    ///
    /// The king must not be in check, nothing but the king and that rook may stand
    /// between either piece and its target, and the king may neither cross nor land on
    /// an attacked square.
    pub(crate) fn can_castle(&self, colour: Colour, side: CastlingSide) -> bool {
        let rank = colour.home_rank();
        let (Some(king), Some(rook_file)) = (
            self.king_square(colour),
            self.castling_rights.rook_file(colour, side),
        ) else {
            return false;
        };
        let rook = Square::new(rook_file, rank);
        if king.rank() != rank
            || self.piece_on(rook) != Some(Piece::new(PieceKind::Rook, colour))
            || self.is_in_check(colour)
        {
            return false;
        }

        let span = |from: File, to: File| {
            (from.min(to) as u8..=from.max(to) as u8)
                .filter_map(File::from_index)
                .map(move |file| Square::new(file, rank))
        };
        let king_path = span(king.file(), side.king_target());
        let rook_path = span(rook_file, side.rook_target());
        let clear = king_path
            .clone()
            .chain(rook_path)
            .all(|square| square == king || square == rook || self.cell(square).is_empty());
        if !clear
            || king_path
                .into_iter()
                .any(|square| self.is_square_attacked(square, colour.inverse()))
        {
            return false;
        }

        let mut copy = *self;
        copy.side_to_move = colour;
        copy.castle(side).is_ok() && !copy.is_in_check(colour)
    }

    /// Squares the piece on `origin` could move to, ignoring king safety.
    fn candidate_targets(&self, origin: Square, piece: Piece) -> Targets {
        let mut targets = Targets::new();
        let from = origin.grid_index() as isize;
        let mut push = |index: isize| {
            if let Some(square) = Square::from_grid_index(index) {
                // Capacity covers the busiest piece.
                let _ = targets.push(square);
            }
        };
        let open = |index: isize| match self.grid_cell(index) {
            Cell::Empty => true,
            Cell::Occupied(other) => other.colour != piece.colour,
            Cell::Outside => false,
        };

        match piece.kind {
            PieceKind::Pawn => {
                let forward = piece.colour.forward() as isize * GRID_WIDTH as isize;
                let one = from + forward;
                if self.grid_cell(one).is_empty() {
                    push(one);
                    let two = one + forward;
                    if origin.rank() == piece.colour.pawn_rank() && self.grid_cell(two).is_empty()
                    {
                        push(two)
                    }
                }
                for capture in [one - 1, one + 1] {
                    let en_passant = piece.colour == self.side_to_move
                        && self.en_passant.is_some()
                        && Square::from_grid_index(capture) == self.en_passant;
                    let enemy = self
                        .grid_cell(capture)
                        .piece()
                        .is_some_and(|other| other.colour != piece.colour);
                    if enemy || en_passant {
                        push(capture)
                    }
                }
            }
            PieceKind::Knight => KNIGHT_OFFSETS
                .iter()
                .map(|offset| from + offset)
                .filter(|&index| open(index))
                .for_each(push),
            PieceKind::King => KING_OFFSETS
                .iter()
                .map(|offset| from + offset)
                .filter(|&index| open(index))
                .for_each(push),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let diagonals = piece
                    .kind
                    .is_diagonal_slider()
                    .then_some(DIAGONAL_OFFSETS.iter())
                    .into_iter()
                    .flatten();
                let orthogonals = piece
                    .kind
                    .is_orthogonal_slider()
                    .then_some(ORTHOGONAL_OFFSETS.iter())
                    .into_iter()
                    .flatten();
                for step in diagonals.chain(orthogonals) {
                    let mut index = from + step;
                    while open(index) {
                        push(index);
                        if !self.grid_cell(index).is_empty() {
                            break;
                        }
                        index += step
                    }
                }
            }
        }
        targets
    }
}
