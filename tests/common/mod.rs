//! Shared fixtures for the integration tests.
//!
//! `TreeGame` is a hand-written game tree: inner nodes list their children,
//! `Leaf` nodes carry the value the evaluator reports for them, and `Dead` nodes
//! leave the player to move without a legal move.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use isolation_engine::{Board, Evaluator, GameState, Move, Player, Score};

pub enum Tree {
    Node(Vec<Tree>),
    Leaf(Score),
    Dead,
}

pub fn node(children: Vec<Tree>) -> Tree {
    Tree::Node(children)
}

pub fn leaves(values: &[Score]) -> Tree {
    Tree::Node(values.iter().map(|&v| Tree::Leaf(v)).collect())
}

enum Kind {
    Inner(Vec<usize>),
    Leaf(Score),
    Dead,
}

#[derive(Clone)]
pub struct TreeGame {
    arena: Rc<Vec<Kind>>,
    node: usize,
    ply: usize,
    active: Player,
}

impl TreeGame {
    pub fn new(tree: Tree) -> Self {
        let mut arena = Vec::new();
        flatten(tree, &mut arena);
        Self { arena: Rc::new(arena), node: 0, ply: 0, active: Player::One }
    }

    fn kind(&self) -> &Kind {
        &self.arena[self.node]
    }
}

fn flatten(tree: Tree, arena: &mut Vec<Kind>) -> usize {
    let idx = arena.len();
    match tree {
        Tree::Leaf(v) => arena.push(Kind::Leaf(v)),
        Tree::Dead => arena.push(Kind::Dead),
        Tree::Node(children) => {
            arena.push(Kind::Inner(Vec::new()));
            let ids = children.into_iter().map(|child| flatten(child, arena)).collect();
            arena[idx] = Kind::Inner(ids);
        }
    }
    idx
}

impl GameState for TreeGame {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves_for(&self, player: Player) -> Vec<Move> {
        if player != self.active {
            return Vec::new();
        }
        match self.kind() {
            Kind::Inner(children) => (0..children.len()).map(|i| Move::new(0, i)).collect(),
            // a leaf is still playable; searches that go past it just bounce back
            Kind::Leaf(_) => vec![Move::new(0, 0)],
            Kind::Dead => Vec::new(),
        }
    }

    fn forecast_move(&self, mv: Move) -> Self {
        let node = match self.kind() {
            Kind::Inner(children) => children[mv.col],
            _ => self.node,
        };
        Self { arena: Rc::clone(&self.arena), node, ply: self.ply + 1, active: self.active.opponent() }
    }

    fn width(&self) -> usize {
        3
    }

    fn height(&self) -> usize {
        3
    }

    fn move_count(&self) -> usize {
        self.ply
    }
}

/// Reports leaf values as seen by player one.
pub struct LeafValue;

impl Evaluator<TreeGame> for LeafValue {
    fn evaluate(&self, state: &TreeGame, player: Player) -> Score {
        let value = match state.kind() {
            Kind::Leaf(v) => *v,
            _ => 0.0,
        };
        if player == Player::One { value } else { -value }
    }
}

/// Wraps an evaluator and counts how often it is called.
pub struct Counting<E> {
    pub inner: E,
    pub calls: Cell<usize>,
}

impl<E> Counting<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, calls: Cell::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<G: GameState, E: Evaluator<G>> Evaluator<G> for Counting<E> {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        self.calls.set(self.calls.get() + 1);
        self.inner.evaluate(state, player)
    }
}

/// Plays `moves` (indices into the legal move list, taken modulo its length)
/// from an empty board, stopping early if the game ends.
pub fn play_out(width: usize, height: usize, moves: &[usize]) -> Board {
    let mut board = Board::new(width, height).unwrap();
    for &i in moves {
        let legal = board.legal_moves();
        if legal.is_empty() {
            break;
        }
        board = board.forecast_move(legal[i % legal.len()]);
    }
    board
}

/// A time observer whose clock is fine for `calls` queries and expired afterwards.
pub fn expires_after(calls: usize) -> impl Fn() -> f64 {
    let seen = Cell::new(0usize);
    move || {
        seen.set(seen.get() + 1);
        if seen.get() > calls { 0.0 } else { f64::INFINITY }
    }
}
