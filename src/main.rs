use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use paddock::{
    archive::{
        analyze_draw_rules, ConcurrentDuplicateDetector, Deduplicator, DuplicateDetector,
        FuzzyDuplicateDetector, Game, GameSignature, SetupDuplicateDetector,
    },
    chess::{Board, MaterialCensus},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows a position with its fingerprints and state
    Inspect {
        /// Position as a FEN string (standard starting position if absent)
        fen: Option<String>,
    },
    /// Finds duplicate games in a JSON array of games
    Dedup {
        games: PathBuf,
        /// How games are compared
        #[arg(short, long, value_enum, default_value_t = Strategy::Exact)]
        strategy: Strategy,
        /// Ply at which the fuzzy strategy compares games
        #[arg(short, long, default_value_t = 20)]
        depth: usize,
        /// Maximum number of distinct positions remembered
        #[arg(long)]
        max_buckets: Option<usize>,
        /// Snapshot file seeding the detector, updated afterwards
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Number of worker threads (exact and position strategies)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Reports the automatic draw conditions met by each game
    Draws { games: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Same final position after the same number of plies
    Exact,
    /// Same final position
    Position,
    /// Same position at a fixed ply
    Fuzzy,
    /// Same declared starting position
    Setup,
}

pub fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    env_logger::init();

    match args.command {
        Command::Inspect { fen } => inspect(fen.as_deref()),
        Command::Dedup {
            games,
            strategy,
            depth,
            max_buckets,
            snapshot,
            threads,
        } => {
            let games = read_games(&games)?;
            let duplicates = match strategy {
                Strategy::Exact | Strategy::Position => {
                    let mut detector =
                        DuplicateDetector::new().with_exact_plies(strategy == Strategy::Exact);
                    if let Some(max_buckets) = max_buckets {
                        detector = detector.with_max_buckets(max_buckets)
                    }
                    let detector = ConcurrentDuplicateDetector::new(detector);
                    if let Some(snapshot) = &snapshot {
                        detector.load_snapshot(snapshot)?;
                    }
                    let threads = threads.unwrap_or_else(num_cpus::get_physical).max(1);
                    let duplicates = find_duplicates_concurrently(&games, threads, |game| {
                        detector.check_and_add_signature(GameSignature::of_game(game))
                    });
                    if let Some(snapshot) = &snapshot {
                        detector.save_snapshot(snapshot)?;
                    }
                    duplicates
                }
                Strategy::Fuzzy => find_duplicates(&games, FuzzyDuplicateDetector::new(depth)),
                Strategy::Setup => find_duplicates(&games, SetupDuplicateDetector::new()),
            };
            for &index in &duplicates {
                println!("{index}\t{}", describe(&games[index]))
            }
            println!("{} duplicates among {} games", duplicates.len(), games.len());
            Ok(())
        }
        Command::Draws { games } => {
            for (index, game) in read_games(&games)?.iter().enumerate() {
                let result = analyze_draw_rules(game);
                println!("{index}\t{}", serde_json::to_string(&result)?)
            }
            Ok(())
        }
    }
}

fn inspect(fen: Option<&str>) -> anyhow::Result<()> {
    let board = match fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("invalid FEN {fen:?}"))?,
        None => Board::standard(),
    };
    let census = MaterialCensus::of(&board);
    println!("{board}");
    println!("shredder-fen: {}", board.shredder_fen());
    println!(
        "check: {}, checkmate: {}, stalemate: {}",
        board.is_in_check(board.side_to_move()),
        board.is_checkmate(),
        board.is_stalemate()
    );
    println!(
        "zobrist: {:#018x}, weak: {:#010x}",
        board.zobrist_hash(),
        board.weak_hash()
    );
    println!(
        "insufficient material: {}, material odds: {}",
        census.is_insufficient(),
        census.has_material_odds()
    );
    Ok(())
}

fn read_games(path: &Path) -> anyhow::Result<Vec<Game>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    let games: Vec<Game> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of games", path.display()))?;
    log::info!("Read {} games from {}", games.len(), path.display());
    Ok(games)
}

fn describe(game: &Game) -> String {
    let tag = |name: &str| game.tags.get(name).map_or("?", String::as_str);
    format!("{} - {} {}", tag("White"), tag("Black"), game.result)
}

/// Indices of the games found to duplicate an earlier one.
fn find_duplicates(games: &[Game], mut detector: impl Deduplicator) -> Vec<usize> {
    games
        .iter()
        .enumerate()
        .filter_map(|(index, game)| detector.is_duplicate(game).then_some(index))
        .collect()
}

/// Shards games across `threads` workers sharing one duplicate check. Which of two equal
/// games counts as the duplicate depends on scheduling.
///
/// A panic in any worker resumes on the calling thread.
fn find_duplicates_concurrently(
    games: &[Game],
    threads: usize,
    is_duplicate: impl Fn(&Game) -> bool + Sync,
) -> Vec<usize> {
    let is_duplicate = &is_duplicate;
    let chunk_size = games.len().div_ceil(threads).max(1);
    let mut duplicates: Vec<usize> = std::thread::scope(|scope| {
        let workers: Vec<_> = games
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk, games)| {
                scope.spawn(move || {
                    games
                        .iter()
                        .enumerate()
                        .filter(|(_, game)| is_duplicate(game))
                        .map(|(index, _)| chunk * chunk_size + index)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });
    duplicates.sort_unstable();
    duplicates
}
