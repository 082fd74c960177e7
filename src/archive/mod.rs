//! # Archive layer
//! Games as recorded in an archive, and the corpus-wide analyses built on replaying
//! them: duplicate detection under several strategies and draw-rule classification.

pub mod draw_rules;
pub mod duplicates;
pub mod fuzzy;
pub mod game;
pub mod setup;
pub mod snapshot;

pub use draw_rules::{analyze_draw_rules, DrawRuleResult};
pub use duplicates::{ConcurrentDuplicateDetector, DuplicateDetector, GameSignature};
pub use fuzzy::FuzzyDuplicateDetector;
pub use game::{Game, GameResult, MoveNode, MoveTree};
pub use setup::SetupDuplicateDetector;
pub use snapshot::{SnapshotError, SnapshotRecord};

/// A duplicate detection strategy, fed one game at a time.
pub trait Deduplicator {
    /// Checks if `game` duplicates a game seen before, and records it otherwise.
    fn is_duplicate(&mut self, game: &Game) -> bool;

    /// Number of duplicates found so far.
    fn duplicate_count(&self) -> usize;
}
