//! # Duplicate game detection
//!
//! Games are compared through a [`GameSignature`] of one of their positions. Signatures
//! are grouped in buckets keyed by Zobrist hash; a new signature is a duplicate when a
//! signature of its bucket also agrees on the weak hash (and, in exact mode, on the ply
//! count).
//!
//! A detector may cap its number of buckets. Once the cap is reached, signatures whose
//! bucket does not exist yet are refused, while existing buckets keep growing. Nothing is
//! ever evicted.

use std::{
    collections::HashMap,
    path::Path,
    sync::{PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};

use super::{
    game::Game,
    snapshot::{read_snapshot, write_snapshot, SnapshotError, SnapshotRecord},
    Deduplicator,
};
use crate::chess::Board;

/// Fingerprint of a game at one of its positions.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSignature {
    pub zobrist: u64,
    pub weak: u32,
    pub plies: u32,
}
impl GameSignature {
    /// Signature of `board`, reached after `plies` plies.
    pub fn new(board: &Board, plies: usize) -> Self {
        Self {
            zobrist: board.zobrist_hash(),
            weak: board.weak_hash(),
            plies: u32::try_from(plies).unwrap_or(u32::MAX),
        }
    }

    /// Signature of the last reachable position of `game`, with the number of plies
    /// actually played to reach it.
    pub fn of_game(game: &Game) -> Self {
        let (plies, board) = game.final_position();
        Self::new(&board, plies)
    }

    /// Checks if both signatures describe the same game. Ply counts only matter when
    /// `exact` is set.
    #[inline]
    pub fn matches(&self, other: &Self, exact: bool) -> bool {
        self.zobrist == other.zobrist
            && self.weak == other.weak
            && (!exact || self.plies == other.plies)
    }
}

/// Duplicate detector over game signatures.
///
/// # Example
/// ```
/// # use paddock::{archive::{DuplicateDetector, Game}, chess::Board};
/// let mut detector = DuplicateDetector::new().with_exact_plies(true);
/// let game = Game::new();
/// let board = game.final_board();
/// assert!(!detector.check_and_add(&game, &board));
/// assert!(detector.check_and_add(&game, &board));
/// assert_eq!(detector.duplicate_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DuplicateDetector {
    buckets: HashMap<u64, Vec<GameSignature>>,
    exact: bool,
    max_buckets: Option<usize>,
    duplicates: usize,
    signatures: usize,
}
impl DuplicateDetector {
    /// An unbounded detector ignoring ply counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether signatures must also agree on their ply count to match.
    pub fn with_exact_plies(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Caps the number of distinct buckets.
    pub fn with_max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = Some(max_buckets);
        self
    }

    /// Checks if `game`, fingerprinted at `board`, duplicates a game seen before, and
    /// records it otherwise.
    ///
    /// `board` is expected to be the final position of `game`: the signature takes the
    /// number of plies that replay, so a game whose replay stops early is compared at
    /// the ply it actually reached.
    pub fn check_and_add(&mut self, game: &Game, board: &Board) -> bool {
        self.check_and_add_signature(GameSignature::new(board, game.playable_ply_count()))
    }

    /// Checks if a matching signature was seen before, and records it otherwise.
    pub fn check_and_add_signature(&mut self, signature: GameSignature) -> bool {
        if let Some(bucket) = self.buckets.get_mut(&signature.zobrist) {
            if bucket
                .iter()
                .any(|known| known.matches(&signature, self.exact))
            {
                log::debug!("Duplicate of position {:#018x}", signature.zobrist);
                self.duplicates += 1;
                return true;
            }
            bucket.push(signature);
            self.signatures += 1;
            return false;
        }

        if self.is_full() {
            log::debug!(
                "Bucket limit reached, not recording position {:#018x}",
                signature.zobrist
            );
            return false;
        }
        self.buckets.insert(signature.zobrist, vec![signature]);
        self.signatures += 1;
        false
    }

    fn is_full(&self) -> bool {
        self.max_buckets
            .is_some_and(|max_buckets| self.buckets.len() >= max_buckets)
    }

    /// Number of duplicates found so far.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Number of distinct buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored signatures, across all buckets.
    pub fn signature_count(&self) -> usize {
        self.signatures
    }

    /// Forgets every signature and the duplicate count. Configuration is kept.
    pub fn reset(&mut self) {
        self.buckets.clear();
        self.duplicates = 0;
        self.signatures = 0
    }

    /// Every bucket, ordered by Zobrist hash.
    pub fn records(&self) -> Vec<SnapshotRecord> {
        let mut records: Vec<SnapshotRecord> = self
            .buckets
            .iter()
            .map(|(&zobrist, signatures)| SnapshotRecord {
                zobrist,
                signatures: signatures.clone(),
            })
            .collect();
        records.sort_unstable_by_key(|record| record.zobrist);
        records
    }

    /// Seeds the detector with stored buckets, without counting duplicates. Returns the
    /// number of signatures added.
    ///
    /// The bucket cap still applies to buckets not present yet. Records without any
    /// signature are skipped.
    pub fn bulk_load(&mut self, records: impl IntoIterator<Item = SnapshotRecord>) -> usize {
        let mut loaded = 0;
        for record in records {
            if !self.buckets.contains_key(&record.zobrist) && self.is_full() {
                log::debug!(
                    "Bucket limit reached, skipping stored position {:#018x}",
                    record.zobrist
                );
                continue;
            }
            if record.signatures.is_empty() {
                continue;
            }
            let bucket = self.buckets.entry(record.zobrist).or_default();
            for signature in record.signatures {
                if !bucket.contains(&signature) {
                    bucket.push(signature);
                    loaded += 1
                }
            }
        }
        self.signatures += loaded;
        loaded
    }

    /// Seeds the detector from a snapshot file. A missing file loads nothing.
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or holds a malformed record.
    pub fn load_snapshot(&mut self, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
        Ok(self.bulk_load(read_snapshot(path)?))
    }

    /// Writes every bucket to a snapshot file, returning the number of buckets written.
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
        write_snapshot(path, &self.records())
    }
}
impl Deduplicator for DuplicateDetector {
    /// Fingerprints the game at its final position.
    fn is_duplicate(&mut self, game: &Game) -> bool {
        self.check_and_add_signature(GameSignature::of_game(game))
    }

    fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}

/// A [`DuplicateDetector`] shared between threads.
///
/// Every check-and-add runs under a single write lock, so two threads submitting the
/// same game find exactly one duplicate. Counts only take a read lock.
#[derive(Debug, Default)]
pub struct ConcurrentDuplicateDetector {
    inner: RwLock<DuplicateDetector>,
}
impl ConcurrentDuplicateDetector {
    pub fn new(detector: DuplicateDetector) -> Self {
        Self {
            inner: RwLock::new(detector),
        }
    }

    /// See [`DuplicateDetector::check_and_add`].
    pub fn check_and_add(&self, game: &Game, board: &Board) -> bool {
        self.check_and_add_signature(GameSignature::new(board, game.playable_ply_count()))
    }

    /// See [`DuplicateDetector::check_and_add_signature`].
    pub fn check_and_add_signature(&self, signature: GameSignature) -> bool {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .check_and_add_signature(signature)
    }

    pub fn duplicate_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .duplicate_count()
    }

    pub fn bucket_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bucket_count()
    }

    /// Seeds the detector before it is shared. See [`DuplicateDetector::bulk_load`].
    pub fn bulk_load(&self, records: impl IntoIterator<Item = SnapshotRecord>) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .bulk_load(records)
    }

    /// See [`DuplicateDetector::load_snapshot`].
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or holds a malformed record.
    pub fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
        // Read before locking, the file may be large.
        let records = read_snapshot(path)?;
        Ok(self.bulk_load(records))
    }

    /// See [`DuplicateDetector::save_snapshot`].
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
        let records = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records();
        write_snapshot(path, &records)
    }

    pub fn into_inner(self) -> DuplicateDetector {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
impl From<DuplicateDetector> for ConcurrentDuplicateDetector {
    fn from(detector: DuplicateDetector) -> Self {
        Self::new(detector)
    }
}
