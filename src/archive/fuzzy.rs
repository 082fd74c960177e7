//! Duplicate detection at a fixed depth: games sharing their position after the same
//! number of plies are duplicates, however they continue.

use super::{
    duplicates::{DuplicateDetector, GameSignature},
    game::Game,
    Deduplicator,
};

#[derive(Clone, Debug)]
pub struct FuzzyDuplicateDetector {
    depth: usize,
    detector: DuplicateDetector,
}
impl FuzzyDuplicateDetector {
    /// A detector comparing games after `depth` plies. Games shorter than that, or whose
    /// replay stops earlier, are compared at the last position they reach.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            detector: DuplicateDetector::new().with_exact_plies(true),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Checks if a game seen before reached the same position at the same ply, and
    /// records `game` otherwise.
    pub fn check_and_add(&mut self, game: &Game) -> bool {
        let (plies, board) = game.position_at(self.depth);
        self.detector
            .check_and_add_signature(GameSignature::new(&board, plies))
    }

    pub fn duplicate_count(&self) -> usize {
        self.detector.duplicate_count()
    }

    pub fn reset(&mut self) {
        self.detector.reset()
    }
}
impl Deduplicator for FuzzyDuplicateDetector {
    fn is_duplicate(&mut self, game: &Game) -> bool {
        self.check_and_add(game)
    }

    fn duplicate_count(&self) -> usize {
        self.detector.duplicate_count()
    }
}

#[cfg(test)]
mod test {
    use crate::chess::{Move, PieceKind};

    use super::*;

    fn ruy_lopez_or_italian(bishop: &str) -> Game {
        Game::from_moves([
            Move::pawn("e4".parse().unwrap()),
            Move::pawn("e5".parse().unwrap()),
            Move::piece(PieceKind::Knight, "f3".parse().unwrap()),
            Move::piece(PieceKind::Knight, "c6".parse().unwrap()),
            Move::piece(PieceKind::Bishop, bishop.parse().unwrap()),
        ])
    }

    #[test]
    fn shared_opening_is_a_duplicate() {
        let mut detector = FuzzyDuplicateDetector::new(4);
        assert!(!detector.check_and_add(&ruy_lopez_or_italian("b5")));
        assert!(detector.check_and_add(&ruy_lopez_or_italian("c4")));
        assert_eq!(detector.duplicate_count(), 1);
    }

    #[test]
    fn divergence_before_depth_is_not() {
        let mut detector = FuzzyDuplicateDetector::new(5);
        assert!(!detector.check_and_add(&ruy_lopez_or_italian("b5")));
        assert!(!detector.check_and_add(&ruy_lopez_or_italian("c4")));
        assert_eq!(detector.duplicate_count(), 0);
    }

    #[test]
    fn short_games_compare_final_positions() {
        let mut detector = FuzzyDuplicateDetector::new(40);
        assert!(!detector.check_and_add(&ruy_lopez_or_italian("b5")));
        assert!(detector.check_and_add(&ruy_lopez_or_italian("b5")));
        assert!(!detector.check_and_add(&Game::new()));
    }

    #[test]
    fn truncated_replay_compares_at_the_reached_ply() {
        let e4 = || Move::pawn("e4".parse().unwrap());
        let mut detector = FuzzyDuplicateDetector::new(4);
        assert!(!detector.check_and_add(&Game::from_moves([e4()])));
        // The second e4 cannot be played, replay stops after one ply.
        assert!(detector.check_and_add(&Game::from_moves([e4(), e4(), e4()])));
    }
}
