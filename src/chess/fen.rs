//! # Forsyth-Edwards Notation (FEN) utilities.
//!
//! Parses FEN strings into a [`Board`] and formats boards back. Castling rights may be
//! given as `KQkq` or as Shredder-FEN rook file letters; the formatter switches to
//! Shredder-FEN whenever the standard letters cannot describe the position (a king off
//! the e-file or a castling rook off its corner).
//!
//! Only the piece placement and side to move can make parsing fail. Other fields are
//! read leniently: unknown castling letters are ignored, an invalid en passant square
//! reads as `-`, and missing or invalid clocks default to `0` and `1`.

use thiserror::Error;

use super::{
    board::Board,
    castling_rights::CastlingSide,
    colour::Colour,
    piece::Piece,
    square::{File, Rank, Square},
};

/// FEN string of the standard starting position.
pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN parsing errors.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Error)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,
    #[error("unrecognised piece letter {0:?}")]
    InvalidPiece(char),
    #[error("piece placement does not fit on an 8x8 board")]
    PlacementOverflow,
    #[error("invalid side to move {0:?}, expected 'w' or 'b'")]
    InvalidSideToMove(String),
}

impl Board {
    /// Creates a board from a FEN string.
    /// # Errors
    /// Fails on empty input, an unknown piece letter, a placement overflowing the board
    /// or a side to move other than `w`/`b`.
    /// # Example
    /// ```
    /// # use paddock::chess::{Board, Colour, STANDARD_FEN};
    /// let board = Board::from_fen(STANDARD_FEN).unwrap();
    /// assert_eq!(board, Board::standard());
    /// assert_eq!(board.side_to_move(), Colour::White);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_ascii_whitespace();
        let mut board = Self::empty();
        board.parse_placement(fields.next().ok_or(FenError::Empty)?)?;

        board.side_to_move = match fields.next() {
            None | Some("w") => Colour::White,
            Some("b") => Colour::Black,
            Some(other) => return Err(FenError::InvalidSideToMove(other.to_string())),
        };
        if let Some(castling) = fields.next() {
            board.parse_castling(castling)
        }
        board.en_passant = fields.next().and_then(|square| square.parse().ok());
        board.halfmove_clock = fields
            .next()
            .and_then(|clock| clock.parse().ok())
            .unwrap_or(0);
        board.move_number = fields
            .next()
            .and_then(|number| number.parse().ok())
            .filter(|&number| number > 0)
            .unwrap_or(1);

        Ok(board)
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let mut ranks = Rank::ALL.into_iter().rev();
        let mut rank = ranks.next();
        let mut file = 0u8;
        for c in placement.chars() {
            match c {
                '/' => {
                    rank = Some(ranks.next().ok_or(FenError::PlacementOverflow)?);
                    file = 0
                }
                '1'..='8' => {
                    file += c as u8 - b'0';
                    if file > 8 {
                        return Err(FenError::PlacementOverflow);
                    }
                }
                _ => {
                    let piece = Piece::from_symbol(c).ok_or(FenError::InvalidPiece(c))?;
                    let square = Square::new(
                        File::from_index(file).ok_or(FenError::PlacementOverflow)?,
                        rank.ok_or(FenError::PlacementOverflow)?,
                    );
                    self.put(square, Some(piece));
                    file += 1
                }
            }
        }
        Ok(())
    }

    fn parse_castling(&mut self, castling: &str) {
        for c in castling.chars() {
            let colour = Colour::from(!c.is_ascii_uppercase());
            let letter = c.to_ascii_lowercase();
            let (side, rook_file) = match letter {
                'k' => (
                    CastlingSide::Kingside,
                    self.outermost_rook(colour, CastlingSide::Kingside)
                        .unwrap_or(File::H),
                ),
                'q' => (
                    CastlingSide::Queenside,
                    self.outermost_rook(colour, CastlingSide::Queenside)
                        .unwrap_or(File::A),
                ),
                _ => {
                    let Some(rook_file) = File::from_char(letter) else {
                        continue;
                    };
                    let king_file = self
                        .king_square(colour)
                        .filter(|king| king.rank() == colour.home_rank())
                        .map_or(File::E, Square::file);
                    if rook_file > king_file {
                        (CastlingSide::Kingside, rook_file)
                    } else {
                        (CastlingSide::Queenside, rook_file)
                    }
                }
            };
            self.castling_rights.allow(colour, side, rook_file)
        }
    }

    /// Returns a FEN string describing the position, using Shredder-FEN castling
    /// letters only when `KQkq` cannot describe the rights.
    pub fn fen(&self) -> String {
        self.format_fen(self.needs_shredder_castling())
    }

    /// Returns a Shredder-FEN string describing the position.
    pub fn shredder_fen(&self) -> String {
        self.format_fen(true)
    }

    /// Checks if a castling right involves a king off the e-file or a rook off its
    /// corner.
    pub fn needs_shredder_castling(&self) -> bool {
        self.castling_rights.iter().any(|(colour, side, rook_file)| {
            rook_file != side.corner_file()
                || self.king_square(colour).map(Square::file) != Some(File::E)
        })
    }

    fn format_fen(&self, shredder: bool) -> String {
        let mut fen = String::with_capacity(90);
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty != 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0
                        }
                        fen.push(piece.symbol())
                    }
                    None => empty += 1,
                }
            }
            if empty != 0 {
                fen.push_str(&empty.to_string())
            }
            if rank != Rank::One {
                fen.push('/')
            }
        }

        let castling = if shredder {
            self.castling_rights.shredder_notation()
        } else {
            self.castling_rights.to_string()
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |square| square.to_string());
        format!(
            "{fen} {} {castling} {en_passant} {} {}",
            if self.side_to_move.is_black() { 'b' } else { 'w' },
            self.halfmove_clock,
            self.move_number
        )
    }
}

#[cfg(test)]
mod test {
    use crate::chess::piece::PieceKind;

    use super::*;

    #[test]
    fn standard_round_trip() {
        let board = Board::from_fen(STANDARD_FEN).unwrap();
        assert_eq!(board.fen(), STANDARD_FEN);
        assert_eq!(Board::standard().fen(), STANDARD_FEN);
    }

    #[test]
    fn error_cases() {
        assert_eq!(Board::from_fen(""), Err(FenError::Empty));
        assert_eq!(Board::from_fen("   "), Err(FenError::Empty));
        assert_eq!(
            Board::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece('x'))
        );
        assert_eq!(
            Board::from_fen("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::PlacementOverflow)
        );
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::PlacementOverflow)
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K2 x - - 0 1"),
            Err(FenError::InvalidSideToMove("x".to_string()))
        );
    }

    #[test]
    fn optional_fields_default() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(board.side_to_move(), Colour::White);
        assert!(board.castling_rights().is_none());
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.move_number(), 1);
        assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn kings_are_recorded() {
        let board = Board::from_fen("8/8/3k4/8/8/5K2/8/8 b - - 12 40").unwrap();
        assert_eq!(board.kings[Colour::White as usize], "f3".parse().ok());
        assert_eq!(board.kings[Colour::Black as usize], "d6".parse().ok());
        assert_eq!(board.halfmove_clock(), 12);
        assert_eq!(board.move_number(), 40);
    }

    #[test]
    fn en_passant_is_read() {
        let board =
            Board::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3")
                .unwrap();
        assert_eq!(board.en_passant(), "e6".parse().ok());
        let garbled = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - z9 0 1").unwrap();
        assert_eq!(garbled.en_passant(), None);
    }

    #[test]
    fn shredder_castling_letters() {
        let fen = "bqnbrkrn/pppppppp/8/8/8/8/PPPPPPPP/BQNBRKRN w GEge - 0 1";
        let board = Board::from_fen(fen).unwrap();
        let rights = board.castling_rights();
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Kingside), Some(File::G));
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Queenside), Some(File::E));
        assert_eq!(rights.rook_file(Colour::Black, CastlingSide::Kingside), Some(File::G));
        assert_eq!(rights.rook_file(Colour::Black, CastlingSide::Queenside), Some(File::E));
        assert!(board.needs_shredder_castling());
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn xfen_letters_find_the_outer_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/1R2K1R1 w KQ - 0 1").unwrap();
        let rights = board.castling_rights();
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Kingside), Some(File::G));
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Queenside), Some(File::B));
        assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/1R2K1R1 w GB - 0 1");
        assert_eq!(board.shredder_fen(), board.fen());
    }

    #[test]
    fn standard_position_in_shredder_notation() {
        assert_eq!(
            Board::standard().shredder_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1"
        );
        let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1")
            .unwrap();
        assert_eq!(board.fen(), STANDARD_FEN);
    }

    #[test]
    fn placement_is_read_rank_by_rank() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            board.piece_on("h8".parse().unwrap()),
            Some(Piece::new(PieceKind::Rook, Colour::Black))
        );
        assert_eq!(
            board.piece_on("a1".parse().unwrap()),
            Some(Piece::new(PieceKind::Rook, Colour::White))
        );
        assert_eq!(board.pieces().count(), 6);
    }
}
