//! # Moves
//!
//! A [`Move`] is the record of a single ply as handed over by a notation parser. The
//! origin square, and sometimes the destination, may be missing or only partially
//! known (as with SAN disambiguation); [`Board::apply_move`](super::board::Board::apply_move)
//! infers what is missing from the position.

use serde::{Deserialize, Serialize};

use super::{
    piece::PieceKind,
    square::{File, Rank, Square},
};

/// The class of a move, deciding how it transforms the position.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClass {
    PawnMove,
    PawnPromotion,
    EnPassant,
    PieceMove,
    KingsideCastle,
    QueensideCastle,
    NullMove,
}

/// Record of a single ply.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Move {
    pub class: MoveClass,
    /// Kind of the piece moved (pawn moves may leave it unset).
    pub piece: Option<PieceKind>,
    /// File of the origin square, if known.
    pub origin_file: Option<File>,
    /// Rank of the origin square, if known.
    pub origin_rank: Option<Rank>,
    pub target: Option<Square>,
    /// Kind of the piece captured, as recorded by the parser.
    pub captured: Option<PieceKind>,
    /// Piece a pawn promotes to (defaults to a queen).
    pub promoted: Option<PieceKind>,
}
impl Move {
    const fn new(class: MoveClass, piece: Option<PieceKind>, target: Option<Square>) -> Self {
        Self {
            class,
            piece,
            origin_file: None,
            origin_rank: None,
            target,
            captured: None,
            promoted: None,
        }
    }

    /// A pawn push to `target`.
    pub const fn pawn(target: Square) -> Self {
        Self::new(MoveClass::PawnMove, Some(PieceKind::Pawn), Some(target))
    }

    /// A pawn capture from the `from` file onto `target`.
    pub const fn pawn_capture(from: File, target: Square) -> Self {
        Self::pawn(target).with_origin_file(from)
    }

    /// A pawn move to `target` promoting to `promoted`.
    pub const fn promotion(target: Square, promoted: PieceKind) -> Self {
        let mut mv = Self::new(MoveClass::PawnPromotion, Some(PieceKind::Pawn), Some(target));
        mv.promoted = Some(promoted);
        mv
    }

    /// An en passant capture from the `from` file onto `target`.
    pub const fn en_passant(from: File, target: Square) -> Self {
        let mut mv = Self::new(MoveClass::EnPassant, Some(PieceKind::Pawn), Some(target));
        mv.origin_file = Some(from);
        mv.captured = Some(PieceKind::Pawn);
        mv
    }

    /// A non-pawn move of a `kind` piece to `target`.
    pub const fn piece(kind: PieceKind, target: Square) -> Self {
        Self::new(MoveClass::PieceMove, Some(kind), Some(target))
    }

    pub const fn kingside_castle() -> Self {
        Self::new(MoveClass::KingsideCastle, Some(PieceKind::King), None)
    }

    pub const fn queenside_castle() -> Self {
        Self::new(MoveClass::QueensideCastle, Some(PieceKind::King), None)
    }

    pub const fn null() -> Self {
        Self::new(MoveClass::NullMove, None, None)
    }

    /// Sets the file of the origin square.
    pub const fn with_origin_file(mut self, file: File) -> Self {
        self.origin_file = Some(file);
        self
    }

    /// Sets the rank of the origin square.
    pub const fn with_origin_rank(mut self, rank: Rank) -> Self {
        self.origin_rank = Some(rank);
        self
    }

    /// Sets the full origin square.
    pub fn with_origin(self, origin: Square) -> Self {
        self.with_origin_file(origin.file())
            .with_origin_rank(origin.rank())
    }

    /// Records the kind of the captured piece.
    pub const fn capturing(mut self, kind: PieceKind) -> Self {
        self.captured = Some(kind);
        self
    }

    /// The origin square, when both its file and rank are known.
    pub fn origin(&self) -> Option<Square> {
        Some(Square::new(self.origin_file?, self.origin_rank?))
    }

    pub fn is_castle(&self) -> bool {
        matches!(
            self.class,
            MoveClass::KingsideCastle | MoveClass::QueensideCastle
        )
    }
}
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.class {
            MoveClass::KingsideCastle => return write!(f, "O-O"),
            MoveClass::QueensideCastle => return write!(f, "O-O-O"),
            MoveClass::NullMove => return write!(f, "--"),
            MoveClass::PieceMove => {
                if let Some(kind) = self.piece {
                    write!(f, "{kind}")?
                }
            }
            _ => (),
        }
        if let Some(file) = self.origin_file {
            write!(f, "{file}")?
        }
        if let Some(rank) = self.origin_rank {
            write!(f, "{rank}")?
        }
        if self.captured.is_some() || self.class == MoveClass::EnPassant {
            write!(f, "x")?
        }
        match self.target {
            Some(target) => write!(f, "{target}")?,
            None => write!(f, "?")?,
        }
        if self.class == MoveClass::PawnPromotion {
            let promoted = self.promoted.unwrap_or(PieceKind::Queen);
            write!(f, "={promoted}")?
        }
        Ok(())
    }
}
