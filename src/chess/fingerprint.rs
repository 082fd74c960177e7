//! Position fingerprints.
//!
//! Both hashes are computed from scratch on each call: a board never stores them, so
//! they cannot drift from the position they describe.

use super::{board::Board, piece::NUM_PIECES, zobrist};

impl Board {
    /// Returns the Polyglot-layout Zobrist hash of the position, covering placement,
    /// side to move, castling rights and en passant file.
    ///
    /// # Example
    /// ```
    /// # use paddock::chess::{Board, Move};
    /// let mut board = Board::standard();
    /// let start = board.zobrist_hash();
    /// board.apply_move(&Move::null()).unwrap();
    /// assert_ne!(board.zobrist_hash(), start);
    /// board.apply_move(&Move::null()).unwrap();
    /// assert_eq!(board.zobrist_hash(), start);
    /// ```
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = self
            .pieces()
            .fold(0, |hash, (square, piece)| hash ^ zobrist::piece_key(piece, square));
        hash ^= self.castling_rights.zobrist_hash();
        if let Some(square) = self.en_passant {
            hash ^= zobrist::en_passant_key(square.file())
        }
        if self.side_to_move.is_white() {
            hash ^= zobrist::white_to_move_key()
        }
        hash
    }

    /// Returns a cheap checksum of piece placement and side to move.
    ///
    /// Collisions are frequent enough that this only ever serves as a second filter
    /// behind [`Board::zobrist_hash`].
    pub fn weak_hash(&self) -> u32 {
        let seed = self.side_to_move as u32;
        self.pieces().fold(seed, |hash, (square, piece)| {
            let code = (piece.colour as usize * NUM_PIECES + piece.kind as usize + 1) as u32;
            hash.rotate_left(5) ^ (code << 6 | square.index() as u32)
        })
    }
}
