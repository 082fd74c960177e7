//! # Representation of castling rights
//!
//! Each right remembers the file of the rook it castles with, so that Chess960
//! setups (where rooks do not start in the corners) are tracked the same way as the
//! standard game.

use serde::{Deserialize, Serialize};

use super::{colour::Colour, square::File, zobrist};

/// The two sides of the board a king may castle towards.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}
impl CastlingSide {
    /// Both sides, kingside first.
    pub const BOTH: [Self; 2] = [Self::Kingside, Self::Queenside];

    /// File the rook starts on in the standard game.
    pub const fn corner_file(self) -> File {
        match self {
            Self::Kingside => File::H,
            Self::Queenside => File::A,
        }
    }

    /// File the king lands on after castling.
    pub const fn king_target(self) -> File {
        match self {
            Self::Kingside => File::G,
            Self::Queenside => File::C,
        }
    }

    /// File the rook lands on after castling.
    pub const fn rook_target(self) -> File {
        match self {
            Self::Kingside => File::F,
            Self::Queenside => File::D,
        }
    }
}
impl std::fmt::Display for CastlingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kingside => write!(f, "kingside"),
            Self::Queenside => write!(f, "queenside"),
        }
    }
}

/// Castling rights of both colours, stored as the file of the rook each right
/// castles with (`None` when the right is lost).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CastlingRights([Option<File>; 4]);
impl CastlingRights {
    #[inline(always)]
    const fn slot(colour: Colour, side: CastlingSide) -> usize {
        colour as usize * 2 + side as usize
    }

    /// No castling rights for any sides.
    pub const fn none() -> Self {
        Self([None; 4])
    }

    /// Full castling rights for both sides, with rooks in the corners.
    pub const fn standard() -> Self {
        Self([Some(File::H), Some(File::A), Some(File::H), Some(File::A)])
    }

    /// Returns `true` if none of the sides can castle.
    pub fn is_none(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// File of the rook `colour` may castle with towards `side`, if the right remains.
    #[inline(always)]
    pub const fn rook_file(&self, colour: Colour, side: CastlingSide) -> Option<File> {
        self.0[Self::slot(colour, side)]
    }

    /// Checks if castling towards `side` is allowed for `colour`.
    #[inline(always)]
    pub const fn is_allowed(&self, colour: Colour, side: CastlingSide) -> bool {
        self.rook_file(colour, side).is_some()
    }

    /// Allows castling towards `side` for `colour`, with the rook on `rook_file`.
    pub fn allow(&mut self, colour: Colour, side: CastlingSide, rook_file: File) {
        self.0[Self::slot(colour, side)] = Some(rook_file)
    }

    /// Disallows castling towards `side` for `colour`.
    pub fn disallow(&mut self, colour: Colour, side: CastlingSide) {
        self.0[Self::slot(colour, side)] = None
    }

    /// Disallows both castling moves for a given side.
    pub fn disallow_colour(&mut self, colour: Colour) {
        for side in CastlingSide::BOTH {
            self.disallow(colour, side)
        }
    }

    /// Disallows only the right of `colour` whose rook stands on `rook_file`.
    pub fn revoke_rook(&mut self, colour: Colour, rook_file: File) {
        for side in CastlingSide::BOTH {
            if self.rook_file(colour, side) == Some(rook_file) {
                self.disallow(colour, side)
            }
        }
    }

    /// Iterator over the remaining rights, as `(colour, side, rook file)`.
    pub fn iter(&self) -> impl Iterator<Item = (Colour, CastlingSide, File)> + '_ {
        Colour::BOTH.into_iter().flat_map(move |colour| {
            CastlingSide::BOTH
                .into_iter()
                .filter_map(move |side| Some((colour, side, self.rook_file(colour, side)?)))
        })
    }

    /// The castling field in Shredder-FEN notation: rook file letters, uppercase for
    /// White and lowercase for Black.
    pub fn shredder_notation(&self) -> String {
        if self.is_none() {
            return "-".to_string();
        }
        self.iter()
            .map(|(colour, _, file)| {
                if colour.is_white() {
                    file.to_char().to_ascii_uppercase()
                } else {
                    file.to_char()
                }
            })
            .collect()
    }

    /// Returns the Zobrist hash of these castling rights.
    #[inline(always)]
    pub(crate) fn zobrist_hash(&self) -> u64 {
        self.iter()
            .fold(0, |hash, (colour, side, _)| hash ^ zobrist::castling_key(colour, side))
    }
}
impl std::fmt::Display for CastlingRights {
    /// The castling field in standard `KQkq` notation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }
        for (colour, side, _) in self.iter() {
            let letter = match side {
                CastlingSide::Kingside => 'k',
                CastlingSide::Queenside => 'q',
            };
            if colour.is_white() {
                write!(f, "{}", letter.to_ascii_uppercase())?
            } else {
                write!(f, "{letter}")?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_notation() {
        let mut rights = CastlingRights::standard();
        assert_eq!(rights.to_string(), "KQkq");
        rights.disallow(Colour::White, CastlingSide::Kingside);
        rights.disallow(Colour::Black, CastlingSide::Queenside);
        assert_eq!(rights.to_string(), "Qk");
        rights.disallow_colour(Colour::White);
        rights.disallow_colour(Colour::Black);
        assert_eq!(rights.to_string(), "-");
        assert!(rights.is_none());
    }

    #[test]
    fn revoking_a_rook_only_drops_its_right() {
        let mut rights = CastlingRights::none();
        rights.allow(Colour::White, CastlingSide::Kingside, File::G);
        rights.allow(Colour::White, CastlingSide::Queenside, File::B);
        rights.allow(Colour::Black, CastlingSide::Kingside, File::G);
        rights.revoke_rook(Colour::White, File::G);
        assert!(!rights.is_allowed(Colour::White, CastlingSide::Kingside));
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Queenside), Some(File::B));
        assert!(rights.is_allowed(Colour::Black, CastlingSide::Kingside));
        assert_eq!(rights.shredder_notation(), "Bg");
    }
}
