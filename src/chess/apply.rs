//! # Move application
//!
//! [`Board::apply_move`] is the only state transition of a [`Board`]. It trusts the
//! move's class and any squares it names, infers the origin square when it is missing,
//! and never checks king safety: replayed games are assumed legal.
//!
//! Every square is resolved before the board is touched, so a move that cannot be
//! resolved leaves the board exactly as it was.

use thiserror::Error;

use super::{
    action::{Move, MoveClass},
    board::Board,
    castling_rights::CastlingSide,
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{File, Square},
};

/// Candidate origins of a piece move. Ten pieces of a kind is already a stretch.
type Origins = heapless::Vec<Square, 16>;

/// Reasons a move could not be applied.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum MoveError {
    #[error("move has no destination square")]
    MissingTarget,
    #[error("piece move does not say which piece moves")]
    MissingPiece,
    #[error("no {colour} piece can move to {target}")]
    NoOrigin { colour: Colour, target: Square },
    #[error("{0} has no king")]
    NoKing(Colour),
    #[error("{colour} has no rook to castle {side} with")]
    NoCastlingRook { colour: Colour, side: CastlingSide },
}

impl Board {
    /// Plays a move on the board, modifying the position.
    /// # Errors
    /// Fails if the move has no destination or if its origin (or castling rook) cannot
    /// be found. The board is left untouched in that case.
    /// # Example
    /// ```
    /// # use paddock::chess::*;
    /// let mut board = Board::standard();
    /// board.apply_move(&Move::pawn("e4".parse().unwrap())).unwrap();
    /// board.apply_move(&Move::piece(PieceKind::Knight, "c6".parse().unwrap())).unwrap();
    /// assert_eq!(board.fen(), "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2");
    /// ```
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        match mv.class {
            MoveClass::NullMove => {
                self.side_to_move.invert();
                self.en_passant = None;
                Ok(())
            }
            MoveClass::PawnMove | MoveClass::PawnPromotion | MoveClass::EnPassant => {
                self.apply_pawn_move(mv)
            }
            MoveClass::PieceMove => self.apply_piece_move(mv),
            MoveClass::KingsideCastle => self.castle(CastlingSide::Kingside),
            MoveClass::QueensideCastle => self.castle(CastlingSide::Queenside),
        }
    }

    fn apply_pawn_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let colour = self.side_to_move;
        let pawn = Piece::new(PieceKind::Pawn, colour);
        let target = mv.target.ok_or(MoveError::MissingTarget)?;
        let origin = match mv.origin() {
            Some(origin) => Some(origin).filter(|&origin| self.piece_on(origin) == Some(pawn)),
            None => self.find_pawn_origin(mv, target, colour),
        }
        .ok_or(MoveError::NoOrigin { colour, target })?;

        let diagonal = origin.file() != target.file();
        let en_passant = diagonal
            && (mv.class == MoveClass::EnPassant
                || (self.cell(target).is_empty() && self.en_passant == Some(target)));
        let promotes = mv.class == MoveClass::PawnPromotion
            || target.rank() == colour.promotion_rank();
        let placed = if promotes {
            let kind = mv
                .promoted
                .filter(PieceKind::is_valid_promotion_target)
                .unwrap_or(PieceKind::Queen);
            Piece::new(kind, colour)
        } else {
            pawn
        };

        if en_passant {
            // The captured pawn stands beside the origin, behind the target.
            self.put(Square::new(target.file(), origin.rank()), None)
        } else if let Some(captured) = self.piece_on(target) {
            self.revoke_rook_right(captured, target)
        }
        self.put(origin, None);
        self.put(target, Some(placed));

        let double_push = (target.rank() as i8 - origin.rank() as i8).abs() == 2 && !diagonal;
        self.en_passant = if double_push {
            origin.offset(0, colour.forward())
        } else {
            None
        };
        self.halfmove_clock = 0;
        self.finish_turn();
        Ok(())
    }

    /// Finds the pawn of `colour` that can reach `target`, one rank behind it for a
    /// capture, one or two squares behind it for a push.
    fn find_pawn_origin(&self, mv: &Move, target: Square, colour: Colour) -> Option<Square> {
        let pawn = Some(Piece::new(PieceKind::Pawn, colour));
        let back = -colour.forward();
        let capture = mv.class == MoveClass::EnPassant
            || mv.captured.is_some()
            || mv.origin_file.is_some_and(|file| file != target.file());

        if capture {
            let rank = target.rank().offset(back)?;
            let is_pawn = |file: &File| self.piece_on(Square::new(*file, rank)) == pawn;
            let adjacent = |file: &File| (*file as i8 - target.file() as i8).abs() == 1;
            let origin_file = match mv.origin_file {
                Some(file) => Some(file).filter(adjacent).filter(is_pawn),
                None => [-1, 1]
                    .into_iter()
                    .filter_map(|delta| target.file().offset(delta))
                    .find(is_pawn),
            }?;
            return Some(Square::new(origin_file, rank));
        }

        let one_back = target.offset(0, back)?;
        if self.piece_on(one_back) == pawn {
            return Some(one_back);
        }
        let two_back = one_back.offset(0, back)?;
        (two_back.rank() == colour.pawn_rank()
            && self.cell(one_back).is_empty()
            && self.piece_on(two_back) == pawn)
            .then_some(two_back)
    }

    fn apply_piece_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let colour = self.side_to_move;
        let target = mv.target.ok_or(MoveError::MissingTarget)?;
        let (origin, piece) = match mv.origin() {
            Some(origin) => {
                let piece = self
                    .piece_on(origin)
                    .filter(|piece| {
                        piece.colour == colour && mv.piece.map_or(true, |kind| kind == piece.kind)
                    })
                    .ok_or(MoveError::NoOrigin { colour, target })?;
                (origin, piece)
            }
            None => {
                let kind = mv.piece.ok_or(MoveError::MissingPiece)?;
                let origin = self
                    .find_piece_origin(mv, kind, target, colour)
                    .ok_or(MoveError::NoOrigin { colour, target })?;
                (origin, Piece::new(kind, colour))
            }
        };

        let captured = self
            .piece_on(target)
            .filter(|captured| captured.colour != colour);
        if let Some(captured) = captured {
            self.revoke_rook_right(captured, target)
        }
        match piece.kind {
            PieceKind::King => self.castling_rights.disallow_colour(colour),
            PieceKind::Rook => self.revoke_rook_right(piece, origin),
            _ => (),
        }
        self.put(origin, None);
        self.put(target, Some(piece));

        self.en_passant = None;
        self.halfmove_clock = if captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        self.finish_turn();
        Ok(())
    }

    /// Finds the `kind` piece of `colour` that can reach `target`, honoring the origin
    /// file/rank hints of the move.
    ///
    /// When several pieces qualify (the notation left out a pinned one), the first one
    /// whose departure keeps its king safe wins.
    fn find_piece_origin(
        &self,
        mv: &Move,
        kind: PieceKind,
        target: Square,
        colour: Colour,
    ) -> Option<Square> {
        let piece = Some(Piece::new(kind, colour));
        let mut origins = Origins::new();
        for square in Square::iter() {
            if square == target
                || self.piece_on(square) != piece
                || mv.origin_file.is_some_and(|file| file != square.file())
                || mv.origin_rank.is_some_and(|rank| rank != square.rank())
                || !self.can_reach(kind, square, target)
            {
                continue;
            }
            if origins.push(square).is_err() {
                break;
            }
        }

        match origins.as_slice() {
            [] => None,
            [origin] => Some(*origin),
            [first, ..] => origins
                .iter()
                .copied()
                .find(|&origin| self.leaves_king_safe(origin, target, colour))
                .or(Some(*first)),
        }
    }

    pub(crate) fn castle(&mut self, side: CastlingSide) -> Result<(), MoveError> {
        let colour = self.side_to_move;
        let king_origin = self.king_square(colour).ok_or(MoveError::NoKing(colour))?;
        let rank = king_origin.rank();
        let rook = Piece::new(PieceKind::Rook, colour);
        let rook_file = self
            .castling_rights
            .rook_file(colour, side)
            .filter(|&file| self.piece_on(Square::new(file, rank)) == Some(rook))
            .or_else(|| self.outermost_rook(colour, side))
            .ok_or(MoveError::NoCastlingRook { colour, side })?;

        // Both pieces leave before either lands: in Chess960 the targets may overlap
        // the origins.
        self.put(king_origin, None);
        self.put(Square::new(rook_file, rank), None);
        self.put(
            Square::new(side.king_target(), rank),
            Some(Piece::new(PieceKind::King, colour)),
        );
        self.put(Square::new(side.rook_target(), rank), Some(rook));

        self.castling_rights.disallow_colour(colour);
        self.en_passant = None;
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        self.finish_turn();
        Ok(())
    }

    /// Drops the castling right tied to a rook leaving (or captured on) `square`.
    fn revoke_rook_right(&mut self, piece: Piece, square: Square) {
        if piece.kind == PieceKind::Rook && square.rank() == piece.colour.home_rank() {
            self.castling_rights.revoke_rook(piece.colour, square.file())
        }
    }
}

#[cfg(test)]
mod test {
    use crate::chess::square::Rank;

    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn null_move_only_flips_the_side() {
        let mut board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 3 7")
                .unwrap();
        board.apply_move(&Move::null()).unwrap();
        assert_eq!(
            board.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 3 7"
        );
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut board = Board::standard();
        board.apply_move(&Move::pawn(sq("e4"))).unwrap();
        assert_eq!(board.en_passant(), Some(sq("e3")));
        assert_eq!(board.side_to_move(), Colour::Black);
        assert_eq!(board.move_number(), 1);
        board.apply_move(&Move::pawn(sq("e6"))).unwrap();
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.move_number(), 2);
    }

    #[test]
    fn double_push_needs_a_free_path() {
        let mut board =
            Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        let before = board;
        assert_eq!(
            board.apply_move(&Move::pawn(sq("e4"))),
            Err(MoveError::NoOrigin {
                colour: Colour::White,
                target: sq("e4")
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn pawn_capture_infers_origin() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        board
            .apply_move(&Move::pawn(sq("d5")).capturing(PieceKind::Pawn))
            .unwrap();
        assert_eq!(
            board.fen(),
            "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2"
        );
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 5 40").unwrap();
        let mut mv = Move::promotion(sq("b8"), PieceKind::Queen);
        mv.promoted = None;
        board.apply_move(&mv).unwrap();
        assert_eq!(board.fen(), "1Q2k3/8/8/8/8/8/8/4K3 b - - 0 40");

        let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 5 40").unwrap();
        board
            .apply_move(&Move::promotion(sq("b8"), PieceKind::Knight))
            .unwrap();
        assert_eq!(
            board.piece_on(sq("b8")),
            Some(Piece::new(PieceKind::Knight, Colour::White))
        );
    }

    #[test]
    fn promotion_capture_revokes_rook_right() {
        let mut board = Board::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1").unwrap();
        board
            .apply_move(
                &Move::promotion(sq("a8"), PieceKind::Queen)
                    .with_origin_file(File::B)
                    .capturing(PieceKind::Rook),
            )
            .unwrap();
        assert!(board.castling_rights().is_none());
        assert_eq!(board.fen(), "Q3k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn knight_move_counts_halfmoves() {
        let mut board = Board::standard();
        board
            .apply_move(&Move::piece(PieceKind::Knight, sq("f3")))
            .unwrap();
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.piece_on(sq("g1")), None);
    }

    #[test]
    fn sliders_need_a_clear_path() {
        let mut board = Board::standard();
        let before = board;
        assert!(board
            .apply_move(&Move::piece(PieceKind::Bishop, sq("c4")))
            .is_err());
        assert!(board
            .apply_move(&Move::piece(PieceKind::Rook, sq("a3")))
            .is_err());
        assert!(board
            .apply_move(&Move::piece(PieceKind::Queen, sq("d3")))
            .is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn disambiguation_hints() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        board
            .apply_move(&Move::piece(PieceKind::Rook, sq("d1")).with_origin_file(File::A))
            .unwrap();
        assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/3RK2R b - - 1 1");

        let mut board = Board::from_fen("R3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        board
            .apply_move(&Move::piece(PieceKind::Rook, sq("a4")).with_origin_rank(Rank::Eight))
            .unwrap();
        assert_eq!(board.fen(), "4k3/8/8/8/R7/8/8/R3K3 b - - 1 1");
    }

    #[test]
    fn pinned_candidate_is_skipped() {
        let mut board = Board::from_fen("7k/8/8/8/8/6N1/8/K1N1r3 w - - 0 1").unwrap();
        board
            .apply_move(&Move::piece(PieceKind::Knight, sq("e2")))
            .unwrap();
        assert_eq!(
            board.piece_on(sq("c1")),
            Some(Piece::new(PieceKind::Knight, Colour::White))
        );
        assert_eq!(board.piece_on(sq("g3")), None);
        assert_eq!(
            board.piece_on(sq("e2")),
            Some(Piece::new(PieceKind::Knight, Colour::White))
        );
    }

    #[test]
    fn king_moves_drop_both_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board
            .apply_move(&Move::piece(PieceKind::King, sq("e2")))
            .unwrap();
        assert_eq!(board.castling_rights().to_string(), "kq");
        assert_eq!(board.king_square(Colour::White), Some(sq("e2")));
    }

    #[test]
    fn rook_capture_drops_both_rook_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board
            .apply_move(&Move::piece(PieceKind::Rook, sq("h8")).capturing(PieceKind::Rook))
            .unwrap();
        assert_eq!(board.fen(), "r3k2R/8/8/8/8/8/8/R3K3 b Qq - 0 1");
    }

    #[test]
    fn queenside_castle() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 10").unwrap();
        board.apply_move(&Move::queenside_castle()).unwrap();
        assert_eq!(board.fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 4 11");
        assert_eq!(board.king_square(Colour::Black), Some(sq("c8")));
    }

    #[test]
    fn chess960_castle_uses_the_tracked_rook() {
        let mut board = Board::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w GBgb - 0 1").unwrap();
        board.apply_move(&Move::queenside_castle()).unwrap();
        assert_eq!(board.fen(), "1r2k1r1/8/8/8/8/8/8/2KR2R1 b gb - 1 1");

        // King and rook swap places.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/5KR1 w G - 0 1").unwrap();
        board.apply_move(&Move::kingside_castle()).unwrap();
        assert_eq!(
            board.piece_on(sq("g1")),
            Some(Piece::new(PieceKind::King, Colour::White))
        );
        assert_eq!(
            board.piece_on(sq("f1")),
            Some(Piece::new(PieceKind::Rook, Colour::White))
        );
    }

    #[test]
    fn castle_without_rook_fails_cleanly() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = board;
        assert_eq!(
            board.apply_move(&Move::kingside_castle()),
            Err(MoveError::NoCastlingRook {
                colour: Colour::White,
                side: CastlingSide::Kingside
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn missing_target_is_rejected() {
        let mut board = Board::standard();
        let mut mv = Move::piece(PieceKind::Knight, sq("f3"));
        mv.target = None;
        assert_eq!(board.apply_move(&mv), Err(MoveError::MissingTarget));
        assert_eq!(board, Board::standard());
    }
}
