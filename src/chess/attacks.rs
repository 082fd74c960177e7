//! Attack detection on the padded grid.
//!
//! Every geometry is expressed as a grid offset; walking off the playable area lands on
//! a [`Cell::Outside`](super::board::Cell::Outside) cell, which stops a ray like any
//! other piece but never matches an attacker.

use super::{
    board::{Board, Cell},
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{Square, GRID_WIDTH},
};

const WIDTH: isize = GRID_WIDTH as isize;

pub(crate) const KNIGHT_OFFSETS: [isize; 8] = [
    -2 * WIDTH - 1,
    -2 * WIDTH + 1,
    -WIDTH - 2,
    -WIDTH + 2,
    WIDTH - 2,
    WIDTH + 2,
    2 * WIDTH - 1,
    2 * WIDTH + 1,
];
pub(crate) const KING_OFFSETS: [isize; 8] = [
    -WIDTH - 1,
    -WIDTH,
    -WIDTH + 1,
    -1,
    1,
    WIDTH - 1,
    WIDTH,
    WIDTH + 1,
];
pub(crate) const DIAGONAL_OFFSETS: [isize; 4] = [-WIDTH - 1, -WIDTH + 1, WIDTH - 1, WIDTH + 1];
pub(crate) const ORTHOGONAL_OFFSETS: [isize; 4] = [-WIDTH, -1, 1, WIDTH];

impl Board {
    /// Checks if any piece of colour `by` attacks `square`.
    ///
    /// Pieces of `by` pinned to their own king still attack.
    pub fn is_square_attacked(&self, square: Square, by: Colour) -> bool {
        let origin = square.grid_index() as isize;
        let holds = |index: isize, kind: PieceKind| {
            self.grid_cell(index) == Cell::Occupied(Piece::new(kind, by))
        };

        // An attacking pawn stands one rank behind the square, from its own point of
        // view.
        let behind = origin - WIDTH * by.forward() as isize;
        if holds(behind - 1, PieceKind::Pawn) || holds(behind + 1, PieceKind::Pawn) {
            return true;
        }
        if KNIGHT_OFFSETS
            .iter()
            .any(|offset| holds(origin + offset, PieceKind::Knight))
        {
            return true;
        }
        if KING_OFFSETS
            .iter()
            .any(|offset| holds(origin + offset, PieceKind::King))
        {
            return true;
        }

        DIAGONAL_OFFSETS
            .iter()
            .any(|&step| self.ray_hits(origin, step, by, PieceKind::is_diagonal_slider))
            || ORTHOGONAL_OFFSETS
                .iter()
                .any(|&step| self.ray_hits(origin, step, by, PieceKind::is_orthogonal_slider))
    }

    /// Walks from `origin` by `step` and checks if the first piece met is a slider of
    /// colour `by` moving along this line.
    fn ray_hits(
        &self,
        origin: isize,
        step: isize,
        by: Colour,
        slides: impl Fn(PieceKind) -> bool,
    ) -> bool {
        let mut index = origin + step;
        loop {
            match self.grid_cell(index) {
                Cell::Empty => index += step,
                Cell::Occupied(piece) => return piece.colour == by && slides(piece.kind),
                Cell::Outside => return false,
            }
        }
    }

    /// Checks if the king of the given colour is attacked. A side without a king is
    /// never in check.
    pub fn is_in_check(&self, colour: Colour) -> bool {
        self.king_square(colour)
            .is_some_and(|king| self.is_square_attacked(king, colour.inverse()))
    }

    /// Checks if a `kind` piece standing on `from` could move to `to` on this board,
    /// ignoring what stands on `to` and whether the move exposes its king.
    ///
    /// Pawns are resolved separately, as their moves depend on their colour.
    pub(crate) fn can_reach(&self, kind: PieceKind, from: Square, to: Square) -> bool {
        let delta = to.grid_index() as isize - from.grid_index() as isize;
        let files = to.file() as i8 - from.file() as i8;
        let ranks = to.rank() as i8 - from.rank() as i8;
        let diagonal = files != 0 && files.abs() == ranks.abs();
        let straight = (files == 0) != (ranks == 0);
        match kind {
            PieceKind::Pawn => false,
            PieceKind::Knight => KNIGHT_OFFSETS.contains(&delta),
            PieceKind::King => KING_OFFSETS.contains(&delta),
            PieceKind::Bishop => diagonal && self.path_clear(from, to),
            PieceKind::Rook => straight && self.path_clear(from, to),
            PieceKind::Queen => (diagonal || straight) && self.path_clear(from, to),
        }
    }

    /// Checks if every square strictly between `from` and `to` is empty. Both squares
    /// must share a line or a diagonal.
    fn path_clear(&self, from: Square, to: Square) -> bool {
        let files = (to.file() as i8 - from.file() as i8).signum() as isize;
        let ranks = (to.rank() as i8 - from.rank() as i8).signum() as isize;
        let step = ranks * WIDTH + files;
        let end = to.grid_index() as isize;
        let mut index = from.grid_index() as isize + step;
        while index != end {
            if !self.grid_cell(index).is_empty() {
                return false;
            }
            index += step
        }
        true
    }
}
