//! # Chess core
//! The mutable position ([`board::Board`]), the record of a single ply
//! ([`action::Move`]) and everything needed to replay games on it: move application,
//! attack detection, legal-move existence, FEN parsing/formatting and position hashing.

pub mod action;
mod apply;
mod attacks;
pub mod board;
pub mod castling_rights;
pub mod colour;
pub mod fen;
mod fingerprint;
mod legality;
pub mod material;
pub mod piece;
pub mod square;
mod zobrist;

pub use action::{Move, MoveClass};
pub use apply::MoveError;
pub use board::{Board, BoardState, Cell};
pub use castling_rights::{CastlingRights, CastlingSide};
pub use colour::Colour;
pub use fen::{FenError, STANDARD_FEN};
pub use material::MaterialCensus;
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
