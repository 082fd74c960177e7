//! Automatic draw conditions of a recorded game.

use std::collections::HashMap;

use serde::Serialize;

use super::game::Game;
use crate::chess::MaterialCensus;

/// Halfmove clock value at which the 75-move rule ends the game.
pub const SEVENTY_FIVE_MOVE_PLIES: u16 = 150;
/// Number of occurrences of a position ending the game.
pub const FIVEFOLD_REPETITION: u32 = 5;

/// Draw conditions met by a game.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize)]
pub struct DrawRuleResult {
    /// 75 moves by each side passed without a capture or pawn move.
    pub seventy_five_move_rule: bool,
    /// A position occurred five times.
    pub fivefold_repetition: bool,
    /// The final position cannot be won by either side.
    pub insufficient_material: bool,
    /// The game started with other material than the standard position.
    pub material_odds: bool,
}

/// Replays the mainline of a game from its setup and reports the draw conditions met
/// along the way.
///
/// Positions are told apart by Zobrist hash. If replay stops early, the last reachable
/// position counts as final.
pub fn analyze_draw_rules(game: &Game) -> DrawRuleResult {
    let mut result = DrawRuleResult::default();
    let mut occurrences: HashMap<u64, u32> = HashMap::new();
    let mut last = None;
    for board in game.positions() {
        if last.is_none() {
            result.material_odds = MaterialCensus::of(&board).has_material_odds();
        }
        if board.halfmove_clock() >= SEVENTY_FIVE_MOVE_PLIES {
            result.seventy_five_move_rule = true
        }
        let count = occurrences.entry(board.zobrist_hash()).or_default();
        *count += 1;
        if *count >= FIVEFOLD_REPETITION {
            result.fivefold_repetition = true
        }
        last = Some(board)
    }
    result.insufficient_material = last
        .is_some_and(|board| MaterialCensus::of(&board).is_insufficient());
    result
}

#[cfg(test)]
mod test {
    use crate::chess::{Move, PieceKind};

    use super::*;

    fn knight_shuffle(rounds: usize) -> Game {
        let knight = |target: &str| Move::piece(PieceKind::Knight, target.parse().unwrap());
        Game::from_moves(
            (0..rounds).flat_map(|_| [knight("f3"), knight("f6"), knight("g1"), knight("g8")]),
        )
    }

    #[test]
    fn standard_game_meets_nothing() {
        assert_eq!(analyze_draw_rules(&Game::new()), DrawRuleResult::default());
    }

    #[test]
    fn fivefold_repetition() {
        assert!(analyze_draw_rules(&knight_shuffle(4)).fivefold_repetition);
        assert!(!analyze_draw_rules(&knight_shuffle(3)).fivefold_repetition);
    }

    #[test]
    fn seventy_five_move_rule() {
        let game = Game::from_moves([Move::piece(PieceKind::Rook, "h2".parse().unwrap())])
            .with_tag("FEN", "4k3/8/8/8/8/8/8/4K2R w - - 149 80");
        let result = analyze_draw_rules(&game);
        assert!(result.seventy_five_move_rule);
        assert!(result.material_odds);
        assert!(!result.insufficient_material);

        let game = Game::new().with_tag("FEN", "4k3/8/8/8/8/8/8/4K2R w - - 149 80");
        assert!(!analyze_draw_rules(&game).seventy_five_move_rule);
    }

    #[test]
    fn insufficient_final_position() {
        let game = Game::from_moves([Move::piece(PieceKind::King, "e7".parse().unwrap())
            .capturing(PieceKind::Rook)])
        .with_tag("FEN", "3k4/4R3/8/8/8/8/8/4K3 b - - 0 1");
        let result = analyze_draw_rules(&game);
        assert!(result.insufficient_material);
        assert!(result.material_odds);
    }
}
