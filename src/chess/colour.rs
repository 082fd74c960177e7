//! Colours for each players and their pieces.

use serde::{Deserialize, Serialize};

use super::square::Rank;

/// Number of different colours (2).
pub const NUM_COLOURS: usize = 2;

/// Colour enumeration.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    White = 0,
    Black = 1,
}
impl Colour {
    /// Both colours, White first.
    pub const BOTH: [Self; 2] = [Self::White, Self::Black];

    /// Inverts the colour in place.
    /// # Example
    /// ```
    /// # use paddock::chess::colour::Colour;
    /// let mut side_to_move = Colour::White;
    /// side_to_move.invert();
    /// assert_eq!(side_to_move, Colour::Black);
    /// ```
    #[inline]
    pub fn invert(&mut self) {
        *self = self.inverse()
    }

    /// Returns the inverse of this colour.
    /// # Example
    /// ```
    /// # use paddock::chess::colour::Colour;
    /// assert_eq!(Colour::White.inverse(), Colour::Black);
    /// ```
    #[inline]
    pub const fn inverse(&self) -> Self {
        if self.is_black() {
            Colour::White
        } else {
            Colour::Black
        }
    }

    /// Checks if the colour variant is white.
    #[inline]
    pub const fn is_white(&self) -> bool {
        matches!(self, Colour::White)
    }

    /// Checks if the colour variant is black.
    #[inline]
    pub const fn is_black(&self) -> bool {
        matches!(self, Colour::Black)
    }

    /// Rank delta of a pawn push for this colour (+1 for White, -1 for Black).
    #[inline]
    pub const fn forward(&self) -> i8 {
        if self.is_black() {
            -1
        } else {
            1
        }
    }

    /// The rank pieces of this colour start on (and castle along).
    #[inline]
    pub const fn home_rank(&self) -> Rank {
        if self.is_black() {
            Rank::Eight
        } else {
            Rank::One
        }
    }

    /// The rank pawns of this colour start on, from which they may push twice.
    #[inline]
    pub const fn pawn_rank(&self) -> Rank {
        if self.is_black() {
            Rank::Seven
        } else {
            Rank::Two
        }
    }

    /// The rank on which pawns of this colour promote.
    #[inline]
    pub const fn promotion_rank(&self) -> Rank {
        self.inverse().home_rank()
    }
}
impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_black() { "Black" } else { "White" })
    }
}
impl From<bool> for Colour {
    fn from(value: bool) -> Self {
        if value {
            Self::Black
        } else {
            Self::White
        }
    }
}
