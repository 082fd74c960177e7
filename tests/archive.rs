use std::sync::Arc;

use paddock::{
    archive::{
        analyze_draw_rules, ConcurrentDuplicateDetector, Deduplicator, DuplicateDetector,
        FuzzyDuplicateDetector, Game, GameResult, GameSignature, SetupDuplicateDetector,
        SnapshotError,
    },
    chess::Board,
};

const GAMES: &str = r#"[
    {
        "tags": {"White": "Morphy", "Black": "Duke Karl / Count Isouard"},
        "moves": [
            {"class": "pawn_move", "target": "e4"},
            {"class": "pawn_move", "target": "e5"},
            {"class": "piece_move", "piece": "knight", "target": "f3"},
            {"class": "pawn_move", "target": "d6"}
        ],
        "result": "1-0"
    },
    {
        "tags": {"White": "Anon", "Black": "Anon"},
        "moves": [
            {"class": "piece_move", "piece": "knight", "target": "f3"},
            {"class": "pawn_move", "target": "e5"},
            {"class": "pawn_move", "target": "e4"},
            {"class": "pawn_move", "target": "d6"}
        ],
        "result": "1/2-1/2"
    },
    {
        "tags": {"FEN": "4k3/8/8/8/8/8/8/4K3 w - - 0 1"},
        "moves": [
            {"class": "piece_move", "piece": "king", "target": "e2"},
            {"class": "piece_move", "piece": "king", "target": "e7"}
        ]
    }
]"#;

fn games() -> Vec<Game> {
    serde_json::from_str(GAMES).unwrap()
}

#[test]
fn games_deserialize_and_replay() {
    let games = games();
    assert_eq!(games.len(), 3);
    assert_eq!(games[0].result, GameResult::WhiteWins);
    assert_eq!(games[2].result, GameResult::Unknown);
    assert_eq!(games[0].ply_count(), 4);
    assert_eq!(
        games[0].final_board().fen(),
        "rnbqkbnr/ppp2ppp/3p4/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 3"
    );
    assert_eq!(games[2].final_board().fen(), "8/4k3/8/8/8/8/4K3/8 w - - 2 2");
}

#[test]
fn transpositions_are_caught_by_position() {
    let games = games();
    let mut detector = DuplicateDetector::new();
    let found: Vec<bool> = games.iter().map(|game| detector.is_duplicate(game)).collect();
    assert_eq!(found, [false, true, false]);
    assert_eq!(Deduplicator::duplicate_count(&detector), 1);
}

#[test]
fn setup_detector_ignores_moves() {
    let games = games();
    let mut detector = SetupDuplicateDetector::new();
    let found: Vec<bool> = games.iter().map(|game| detector.is_duplicate(game)).collect();
    assert_eq!(found, [false, true, false]);
}

#[test]
fn fuzzy_detector_compares_early_positions() {
    let games = games();
    let mut shallow = FuzzyDuplicateDetector::new(0);
    let found: Vec<bool> = games.iter().map(|game| shallow.is_duplicate(game)).collect();
    // Both standard games share their starting position.
    assert_eq!(found, [false, true, false]);

    let mut deep = FuzzyDuplicateDetector::new(2);
    let found: Vec<bool> = games.iter().map(|game| deep.is_duplicate(game)).collect();
    assert_eq!(found, [false, false, false]);
}

#[test]
fn strategies_are_interchangeable() {
    let strategies: Vec<Box<dyn Deduplicator>> = vec![
        Box::new(DuplicateDetector::new().with_exact_plies(true)),
        Box::new(FuzzyDuplicateDetector::new(4)),
        Box::new(SetupDuplicateDetector::new()),
    ];
    for mut strategy in strategies {
        for game in games() {
            strategy.is_duplicate(&game);
        }
        assert_eq!(strategy.duplicate_count(), 1);
    }
}

#[test]
fn bounded_detector_never_exceeds_its_ceiling() {
    let mut detector = DuplicateDetector::new().with_max_buckets(3);
    for zobrist in 0..100u64 {
        for weak in 0..3 {
            detector.check_and_add_signature(GameSignature {
                zobrist: zobrist % 5,
                weak,
                plies: 0,
            });
            assert!(detector.bucket_count() <= 3);
        }
    }
    assert_eq!(detector.bucket_count(), 3);
    assert_eq!(detector.signature_count(), 9);
}

#[test]
fn shared_detector_across_threads() {
    let detector = Arc::new(ConcurrentDuplicateDetector::new(
        DuplicateDetector::new().with_exact_plies(true),
    ));
    let games = Arc::new(games());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let detector = Arc::clone(&detector);
            let games = Arc::clone(&games);
            std::thread::spawn(move || {
                games
                    .iter()
                    .filter(|game| detector.check_and_add(game, &game.final_board()))
                    .count()
            })
        })
        .collect();
    let duplicates: usize = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .sum();
    // Twelve submissions of two distinct positions.
    assert_eq!(duplicates, 4 * 3 - 2);
    assert_eq!(detector.duplicate_count(), duplicates);
}

#[test]
fn snapshot_seeds_a_new_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.jsonl");

    let mut first_run = DuplicateDetector::new();
    for game in games() {
        first_run.is_duplicate(&game);
    }
    first_run.save_snapshot(&path).unwrap();

    let mut second_run = DuplicateDetector::new();
    assert_eq!(second_run.load_snapshot(&path).unwrap(), 2);
    for game in games() {
        assert!(second_run.is_duplicate(&game));
    }

    std::fs::write(&path, "{\"zobrist\": 1, \"signatures\": [}\n").unwrap();
    assert!(matches!(
        DuplicateDetector::new().load_snapshot(&path),
        Err(SnapshotError::Malformed { line: 1, .. })
    ));
}

#[test]
fn draw_rules_of_a_king_walk() {
    let games = games();
    let result = analyze_draw_rules(&games[2]);
    assert!(result.insufficient_material);
    assert!(result.material_odds);
    assert!(!result.fivefold_repetition);
    assert!(!result.seventy_five_move_rule);

    let result = analyze_draw_rules(&games[0]);
    assert!(!result.insufficient_material);
    assert!(!result.material_odds);
}

#[test]
fn starting_board_of_untagged_game_is_standard() {
    assert_eq!(Game::new().starting_board(), Board::standard());
    assert_eq!(Game::new().final_board(), Board::standard());
}
