//! Depth-limited minimax and alpha-beta search with cooperative timeouts.
//!
//! Every node checks the [`SearchBudget`] before doing anything else. When the
//! budget runs out the node returns `Err(SearchTimeout)` and `?` unwinds the whole
//! search, so no value computed below the abort point ever reaches a caller.
//!
//! Scores are always from the point of view of the player to move at the root.
//! MAX nodes are that player's turns, MIN nodes the opponent's. A player with no
//! legal move at its own turn has lost: [`LOSS`] at MAX nodes, [`WIN`] at MIN nodes.

use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::game::{GameState, Move, Player, Score, LOSS, WIN};
use crate::heuristics::Evaluator;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search timed out")]
pub struct SearchTimeout;

fn never_expires() -> f64 {
    f64::INFINITY
}

#[derive(Clone, Copy)]
pub struct SearchBudget<'a> {
    time_left: &'a dyn Fn() -> f64,
    threshold_ms: f64,
}

impl<'a> SearchBudget<'a> {
    pub fn new(time_left: &'a dyn Fn() -> f64, timeout: &TimeoutConfig) -> Self {
        Self { time_left, threshold_ms: timeout.threshold_ms() }
    }

    pub fn unlimited() -> SearchBudget<'static> {
        SearchBudget { time_left: &never_expires, threshold_ms: 0.0 }
    }

    pub fn time_left(&self) -> f64 {
        (self.time_left)()
    }

    pub fn check(&self) -> Result<(), SearchTimeout> {
        if self.time_left() < self.threshold_ms {
            Err(SearchTimeout)
        } else {
            Ok(())
        }
    }
}

/// Milliseconds left until `limit` has elapsed, counted from now. Goes negative
/// once the limit has passed.
pub fn countdown(limit: Duration) -> impl Fn() -> f64 {
    let start = Instant::now();
    let limit_ms = limit.as_secs_f64() * 1000.0;
    move || limit_ms - start.elapsed().as_secs_f64() * 1000.0
}

/// Best root move and its value. `best_move` is `None` only when the root has no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub best_move: Option<Move>,
    pub score: Score,
}

impl Decision {
    fn no_move() -> Self {
        Self { best_move: None, score: LOSS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deepening {
    /// From the deepest iteration that ran to completion.
    pub decision: Option<Decision>,
    pub depth_reached: u32,
    pub timed_out: bool,
}

pub struct Search<'a, E> {
    evaluator: &'a E,
    budget: SearchBudget<'a>,
    player: Player,
    nodes: u64,
    // set when some node was scored by the evaluator with moves still available
    depth_limited: bool,
}

impl<'a, E> Search<'a, E> {
    pub fn new(evaluator: &'a E, budget: SearchBudget<'a>, player: Player) -> Self {
        Self { evaluator, budget, player, nodes: 0, depth_limited: false }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn enter(&mut self) -> Result<(), SearchTimeout> {
        self.budget.check()?;
        self.nodes += 1;
        Ok(())
    }

    fn leaf<G: GameState>(&mut self, state: &G) -> Score
    where
        E: Evaluator<G>,
    {
        self.depth_limited = true;
        self.evaluator.evaluate(state, self.player)
    }

    /// Fixed-depth minimax. Ties go to the first move in enumeration order.
    pub fn minimax<G: GameState>(&mut self, state: &G, depth: u32) -> Result<Decision, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok(Decision::no_move());
        };
        let mut best = Decision { best_move: Some(first), score: LOSS };
        for mv in moves {
            let score = self.min_value(&state.forecast_move(mv), depth.saturating_sub(1))?;
            if score > best.score {
                best = Decision { best_move: Some(mv), score };
            }
        }
        Ok(best)
    }

    fn max_value<G: GameState>(&mut self, state: &G, depth: u32) -> Result<Score, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(LOSS);
        }
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let mut value = LOSS;
        for mv in moves {
            value = value.max(self.min_value(&state.forecast_move(mv), depth - 1)?);
        }
        Ok(value)
    }

    fn min_value<G: GameState>(&mut self, state: &G, depth: u32) -> Result<Score, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(WIN);
        }
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let mut value = WIN;
        for mv in moves {
            value = value.min(self.max_value(&state.forecast_move(mv), depth - 1)?);
        }
        Ok(value)
    }

    /// Fixed-depth alpha-beta. Picks the same move and value as [`Search::minimax`]
    /// at equal depth while visiting no more nodes.
    pub fn alphabeta<G: GameState>(
        &mut self,
        state: &G,
        depth: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Result<Decision, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok(Decision::no_move());
        };
        let mut best = Decision { best_move: Some(first), score: LOSS };
        for mv in moves {
            let score = self.ab_min(&state.forecast_move(mv), depth.saturating_sub(1), alpha, beta)?;
            if score > best.score {
                best = Decision { best_move: Some(mv), score };
            }
            alpha = alpha.max(score);
        }
        Ok(best)
    }

    fn ab_max<G: GameState>(&mut self, state: &G, depth: u32, mut alpha: Score, beta: Score) -> Result<Score, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(LOSS);
        }
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let mut score = LOSS;
        for mv in moves {
            score = score.max(self.ab_min(&state.forecast_move(mv), depth - 1, alpha, beta)?);
            if score >= beta {
                break;
            }
            alpha = alpha.max(score);
        }
        Ok(score)
    }

    fn ab_min<G: GameState>(&mut self, state: &G, depth: u32, alpha: Score, mut beta: Score) -> Result<Score, SearchTimeout>
    where
        E: Evaluator<G>,
    {
        self.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(WIN);
        }
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let mut score = WIN;
        for mv in moves {
            score = score.min(self.ab_max(&state.forecast_move(mv), depth - 1, alpha, beta)?);
            if score <= alpha {
                break;
            }
            beta = beta.min(score);
        }
        Ok(score)
    }

    /// Alpha-beta at depth 1, 2, 3, ... until the budget runs out.
    ///
    /// Also stops after `max_depth`, once an iteration never reached the depth
    /// limit (the whole remaining game was searched), or once the root value is
    /// decided. An interrupted iteration is dropped entirely.
    pub fn iterative_deepening<G: GameState>(&mut self, state: &G, max_depth: Option<u32>) -> Deepening
    where
        E: Evaluator<G>,
    {
        let mut outcome = Deepening { decision: None, depth_reached: 0, timed_out: false };
        let mut depth = 1;
        while max_depth.map_or(true, |max| depth <= max) {
            self.depth_limited = false;
            match self.alphabeta(state, depth, LOSS, WIN) {
                Ok(decision) => {
                    debug!(
                        "depth {} complete: move {:?} score {} nodes {}",
                        depth, decision.best_move, decision.score, self.nodes
                    );
                    outcome.decision = Some(decision);
                    outcome.depth_reached = depth;
                    if !self.depth_limited {
                        debug!("search tree exhausted at depth {}", depth);
                        break;
                    }
                    if decision.score.is_infinite() {
                        break;
                    }
                    depth += 1;
                }
                Err(SearchTimeout) => {
                    debug!("timed out during depth {}, keeping depth {}", depth, outcome.depth_reached);
                    outcome.timed_out = true;
                    break;
                }
            }
        }
        outcome
    }
}
