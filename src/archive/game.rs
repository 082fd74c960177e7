//! # Recorded games
//!
//! A [`Game`] holds its tag pairs, its movetext and its result. Movetext is an arena of
//! [`MoveNode`]s linked by index: `next` continues the line a node belongs to, and
//! `variations` lists alternatives to the node's own move. Replay only ever follows the
//! mainline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chess::{Board, Move};

/// Outcome recorded for a game.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    /// Game in progress, abandoned or result unknown.
    #[default]
    #[serde(rename = "*")]
    Unknown,
}
impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Unknown => "*",
        };
        write!(f, "{result}")
    }
}

/// A move within the movetext, with its annotations and links to what follows it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveNode {
    pub mv: Move,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Numeric annotation glyphs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nags: Vec<u8>,
    /// Index of the next move of this line.
    #[serde(default)]
    pub next: Option<usize>,
    /// Indices of the first moves of lines replacing this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<usize>,
}
impl MoveNode {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            comments: vec![],
            nags: vec![],
            next: None,
            variations: vec![],
        }
    }
}

/// Movetext of a game, stored as an arena of [`MoveNode`]s.
///
/// Deserializes either from its arena form (`{"nodes": [...], "first": 0}`) or from a
/// plain array of moves, read as a mainline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MoveTreeRepr")]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
    first: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoveTreeRepr {
    Mainline(Vec<Move>),
    Arena {
        #[serde(default)]
        nodes: Vec<MoveNode>,
        #[serde(default)]
        first: Option<usize>,
    },
}
impl From<MoveTreeRepr> for MoveTree {
    fn from(repr: MoveTreeRepr) -> Self {
        match repr {
            MoveTreeRepr::Mainline(moves) => Self::from_mainline(moves),
            MoveTreeRepr::Arena { nodes, first } => Self { nodes, first },
        }
    }
}

impl MoveTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A movetext made of a single line.
    pub fn from_mainline(moves: impl IntoIterator<Item = Move>) -> Self {
        let mut nodes: Vec<MoveNode> = moves.into_iter().map(MoveNode::new).collect();
        let len = nodes.len();
        for (index, node) in nodes.iter_mut().enumerate() {
            node.next = (index + 1 < len).then_some(index + 1)
        }
        Self {
            first: (len > 0).then_some(0),
            nodes,
        }
    }

    /// Appends a move at the end of the mainline, returning its index.
    pub fn push_mainline(&mut self, mv: Move) -> usize {
        let index = self.nodes.len();
        let last = self.mainline_indices().last();
        self.nodes.push(MoveNode::new(mv));
        match last {
            Some(last) => self.nodes[last].next = Some(index),
            None => self.first = Some(index),
        }
        index
    }

    /// Records `mv` as an alternative to the move at `index`, returning the index of the
    /// new node, or `None` if `index` names no node.
    pub fn add_variation(&mut self, index: usize, mv: Move) -> Option<usize> {
        let variation = self.nodes.len();
        self.nodes.get_mut(index)?.variations.push(variation);
        self.nodes.push(MoveNode::new(mv));
        Some(variation)
    }

    /// Reference to the node at the given index.
    pub fn node(&self, index: usize) -> Option<&MoveNode> {
        self.nodes.get(index)
    }

    /// Mutable reference to the node at the given index.
    pub fn node_mut(&mut self, index: usize) -> Option<&mut MoveNode> {
        self.nodes.get_mut(index)
    }

    /// Number of nodes, variations included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over the moves of the mainline.
    pub fn mainline(&self) -> Mainline<'_> {
        Mainline {
            tree: self,
            current: self.first,
            remaining: self.nodes.len(),
        }
    }

    fn mainline_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let mut current = self.first;
        let mut remaining = self.nodes.len();
        std::iter::from_fn(move || {
            let index = current.filter(|_| remaining > 0)?;
            remaining -= 1;
            current = self.nodes.get(index)?.next;
            Some(index)
        })
    }
}

/// Iterator over the mainline of a [`MoveTree`].
///
/// Never yields more moves than the tree has nodes, even if malformed links form a
/// cycle.
pub struct Mainline<'a> {
    tree: &'a MoveTree,
    current: Option<usize>,
    remaining: usize,
}
impl<'a> Iterator for Mainline<'a> {
    type Item = &'a Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.tree.nodes.get(self.current?)?;
        self.remaining -= 1;
        self.current = node.next;
        Some(&node.mv)
    }
}

/// A recorded game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub moves: MoveTree,
    #[serde(default)]
    pub result: GameResult,
}
impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// A game made of a single line of moves.
    pub fn from_moves(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: MoveTree::from_mainline(moves),
            ..Self::default()
        }
    }

    /// Sets a tag pair.
    pub fn with_tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(tag.into(), value.into());
        self
    }

    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = result;
        self
    }

    /// The starting position declared in the `FEN` tag, if any.
    pub fn setup_fen(&self) -> Option<&str> {
        self.tags.get("FEN").map(String::as_str)
    }

    /// The position the game starts from: the declared setup, or the standard starting
    /// position if there is none or if it cannot be read.
    pub fn starting_board(&self) -> Board {
        match self.setup_fen() {
            None => Board::standard(),
            Some(fen) => Board::from_fen(fen).unwrap_or_else(|error| {
                log::warn!("Invalid setup FEN {fen:?} ({error}), using the standard position");
                Board::standard()
            }),
        }
    }

    /// Number of plies in the mainline.
    pub fn ply_count(&self) -> usize {
        self.moves.mainline().count()
    }

    /// Iterator over the positions of the mainline: the starting position, then the
    /// position after each ply.
    ///
    /// Replay stops at the first move that cannot be applied.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            next: Some(self.starting_board()),
            moves: self.moves.mainline(),
            ply: 0,
        }
    }

    /// The position after `plies` plies, or the last reachable position if the game is
    /// shorter than that.
    pub fn board_at(&self, plies: usize) -> Board {
        self.position_at(plies).1
    }

    /// The last reachable position of the mainline.
    pub fn final_board(&self) -> Board {
        self.final_position().1
    }

    /// Like [`Game::board_at`], along with the number of plies actually played to reach
    /// the position. It falls short of `plies` when the game is shorter or when replay
    /// stopped early.
    pub fn position_at(&self, plies: usize) -> (usize, Board) {
        self.positions()
            .take(plies.saturating_add(1))
            .enumerate()
            .last()
            .unwrap_or_else(|| (0, self.starting_board()))
    }

    /// Like [`Game::final_board`], along with the number of plies played to reach it.
    pub fn final_position(&self) -> (usize, Board) {
        self.positions()
            .enumerate()
            .last()
            .unwrap_or_else(|| (0, self.starting_board()))
    }

    /// Number of mainline plies that replay, which is [`Game::ply_count`] unless a move
    /// cannot be applied.
    pub fn playable_ply_count(&self) -> usize {
        self.positions().count().saturating_sub(1)
    }
}

/// Iterator over the successive positions of a game, see [`Game::positions`].
pub struct Positions<'a> {
    next: Option<Board>,
    moves: Mainline<'a>,
    ply: usize,
}
impl Iterator for Positions<'_> {
    type Item = Board;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let Some(mv) = self.moves.next() {
            let mut board = current;
            match board.apply_move(mv) {
                Ok(()) => self.next = Some(board),
                Err(error) => log::warn!(
                    "Replay stopped at ply {} ({mv}): {error}",
                    self.ply + 1
                ),
            }
        }
        self.ply += 1;
        Some(current)
    }
}

#[cfg(test)]
mod test {
    use crate::chess::{PieceKind, STANDARD_FEN};

    use super::*;

    fn pawn(target: &str) -> Move {
        Move::pawn(target.parse().unwrap())
    }

    #[test]
    fn mainline_skips_variations() {
        let mut tree = MoveTree::new();
        let e4 = tree.push_mainline(pawn("e4"));
        tree.push_mainline(pawn("e5"));
        tree.add_variation(e4, pawn("d4")).unwrap();
        tree.push_mainline(Move::piece(PieceKind::Knight, "f3".parse().unwrap()));
        assert_eq!(tree.len(), 4);
        let moves: Vec<String> = tree.mainline().map(Move::to_string).collect();
        assert_eq!(moves, ["e4", "e5", "Nf3"]);
        assert_eq!(tree.add_variation(17, pawn("c4")), None);
    }

    #[test]
    fn cyclic_links_terminate() {
        let mut tree = MoveTree::from_mainline([pawn("e4"), pawn("e5")]);
        tree.node_mut(1).unwrap().next = Some(0);
        assert_eq!(tree.mainline().count(), 2);
        assert_eq!(tree.mainline_indices().count(), 2);
    }

    #[test]
    fn invalid_setup_falls_back() {
        let game = Game::new().with_tag("FEN", "not a fen");
        assert_eq!(game.starting_board(), Board::standard());
        let game = Game::new().with_tag("FEN", "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(game.starting_board().fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn positions_start_with_the_setup() {
        let game = Game::from_moves([pawn("e4"), pawn("e5")]);
        let fens: Vec<String> = game.positions().map(|board| board.fen()).collect();
        assert_eq!(
            fens,
            [
                STANDARD_FEN,
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
                "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            ]
        );
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.board_at(0), Board::standard());
        assert_eq!(game.board_at(10), game.final_board());
    }

    #[test]
    fn replay_stops_at_unplayable_move() {
        let game = Game::from_moves([pawn("e4"), pawn("e4"), pawn("d5")]);
        assert_eq!(game.positions().count(), 2);
        assert_eq!(game.ply_count(), 3);
        assert_eq!(game.playable_ply_count(), 1);
        assert_eq!(game.final_position(), (1, game.final_board()));
        assert_eq!(game.position_at(0).0, 0);
        assert_eq!(game.position_at(2).0, 1);
        assert_eq!(
            game.final_board().fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn deserialize_both_movetext_forms() {
        let game: Game = serde_json::from_str(
            r#"{
                "tags": {"White": "Anderssen", "FEN": "4k3/8/8/8/8/8/8/4K2R w K - 0 1"},
                "moves": [{"class": "kingside_castle"}],
                "result": "1-0"
            }"#,
        )
        .unwrap();
        assert_eq!(game.result, GameResult::WhiteWins);
        assert_eq!(game.final_board().fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");

        let tree: MoveTree = serde_json::from_str(
            r#"{"nodes": [{"mv": {"class": "pawn_move", "target": "d4"}, "nags": [1]}], "first": 0}"#,
        )
        .unwrap();
        assert_eq!(tree.node(0).map(|node| node.nags.as_slice()), Some(&[1][..]));
        assert_eq!(tree.mainline().count(), 1);
    }

    #[test]
    fn result_notation() {
        assert_eq!(GameResult::Draw.to_string(), "1/2-1/2");
        assert_eq!(
            serde_json::to_string(&GameResult::Unknown).unwrap(),
            r#""*""#
        );
    }
}
