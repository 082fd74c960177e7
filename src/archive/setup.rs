//! Duplicate detection by declared starting position only. No move is replayed.

use std::collections::HashSet;

use super::{game::Game, Deduplicator};
use crate::chess::{Board, STANDARD_FEN};

#[derive(Clone, Debug, Default)]
pub struct SetupDuplicateDetector {
    seen: HashSet<String>,
    duplicates: usize,
}
impl SetupDuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a game seen before declared the same setup, and records `game`
    /// otherwise. Games without a `FEN` tag start from the standard position.
    pub fn check_and_add(&mut self, game: &Game) -> bool {
        let key = Self::setup_key(game);
        if self.seen.insert(key) {
            return false;
        }
        log::debug!("Duplicate setup {:?}", game.setup_fen().unwrap_or(STANDARD_FEN));
        self.duplicates += 1;
        true
    }

    /// The canonical FEN of the declared setup, so that spelling variants of one
    /// position (such as `HAha` for `KQkq`) compare equal. Setups that do not parse are
    /// compared as written.
    fn setup_key(game: &Game) -> String {
        match game.setup_fen() {
            None => STANDARD_FEN.to_string(),
            Some(fen) => Board::from_fen(fen)
                .map(|board| board.fen())
                .unwrap_or_else(|_| fen.trim().to_string()),
        }
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.duplicates = 0
    }
}
impl Deduplicator for SetupDuplicateDetector {
    fn is_duplicate(&mut self, game: &Game) -> bool {
        self.check_and_add(game)
    }

    fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod test {
    use crate::chess::Move;

    use super::*;

    #[test]
    fn missing_setup_is_standard() {
        let mut detector = SetupDuplicateDetector::new();
        assert!(!detector.check_and_add(&Game::new()));
        assert!(detector.check_and_add(&Game::new().with_tag("FEN", STANDARD_FEN)));
        // Moves are not looked at.
        assert!(detector.check_and_add(&Game::from_moves([Move::pawn("e4".parse().unwrap())])));
        assert_eq!(detector.duplicate_count(), 2);
    }

    #[test]
    fn setups_compare_canonically() {
        let mut detector = SetupDuplicateDetector::new();
        let shredder = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1";
        assert!(!detector.check_and_add(&Game::new().with_tag("FEN", shredder)));
        assert!(detector.check_and_add(&Game::new()));
        let odds = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w Qkq - 0 1";
        assert!(!detector.check_and_add(&Game::new().with_tag("FEN", odds)));
    }

    #[test]
    fn unreadable_setups_compare_as_written() {
        let mut detector = SetupDuplicateDetector::new();
        assert!(!detector.check_and_add(&Game::new().with_tag("FEN", "garbage")));
        assert!(detector.check_and_add(&Game::new().with_tag("FEN", " garbage ")));
        // Not mistaken for the standard position it would be replayed from.
        assert!(!detector.check_and_add(&Game::new()));
    }
}
