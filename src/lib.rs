//! # Paddock
//! The position core of a chess game archive.
//!
//! It keeps a legal chess position, replays recorded games on it (including
//! Chess960 castling, en passant, promotions and null moves), and derives position
//! fingerprints used to find duplicate games and classify draw conditions over large
//! collections of games.
//!
//! The crate is split in two layers:
//! - [`chess`]: the board, move application, attack detection, legality queries, the
//!   FEN/Shredder-FEN codec and position hashing.
//! - [`archive`]: parsed games, duplicate detectors and draw-rule analysis built on top
//!   of [`chess`].

pub mod archive;
pub mod chess;
