use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{AgentConfig, TimeoutConfig};
use crate::error::Result;
use crate::game::{GameState, Move, Score};
use crate::heuristics::{Evaluator, Heuristic};
use crate::search::{Search, SearchBudget, SearchTimeout};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Plain minimax to a fixed depth.
    Minimax { depth: u32 },
    /// Iterative-deepening alpha-beta until the clock runs out.
    AlphaBeta {
        #[serde(default)]
        max_depth: Option<u32>,
        /// Take the center cell on the first two plies without searching.
        #[serde(default = "default_true")]
        opening_book: bool,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::AlphaBeta { max_depth: None, opening_book: true }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct SearchReport {
    pub depth_reached: u32,
    pub nodes: u64,
    pub score: Option<Score>,
    pub timed_out: bool,
    pub opening_book: bool,
}

pub struct Agent<E = Heuristic> {
    name: String,
    evaluator: E,
    strategy: Strategy,
    timeout: TimeoutConfig,
    last_report: SearchReport,
}

impl Agent<Heuristic> {
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.name.clone(), config.heuristic, config.strategy, config.timeout))
    }
}

impl<E> Agent<E> {
    pub fn new(name: impl Into<String>, evaluator: E, strategy: Strategy, timeout: TimeoutConfig) -> Self {
        Self { name: name.into(), evaluator, strategy, timeout, last_report: SearchReport::default() }
    }

    pub fn minimax(name: impl Into<String>, evaluator: E, depth: u32) -> Self {
        Self::new(name, evaluator, Strategy::Minimax { depth }, TimeoutConfig::default())
    }

    pub fn alpha_beta(name: impl Into<String>, evaluator: E) -> Self {
        Self::new(name, evaluator, Strategy::default(), TimeoutConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn last_report(&self) -> &SearchReport {
        &self.last_report
    }

    /// Picks a move for the player to move in `state`, or `None` when it has no
    /// legal move. `time_left` reports the milliseconds left in the turn.
    ///
    /// A timeout never escapes: the move from the last completed search is
    /// returned, or `None` if no search completed.
    pub fn get_move<G: GameState>(&mut self, state: &G, time_left: &dyn Fn() -> f64) -> Option<Move>
    where
        E: Evaluator<G>,
    {
        let budget = SearchBudget::new(time_left, &self.timeout);
        let mut report = SearchReport::default();

        let legal_moves = state.legal_moves();
        if legal_moves.is_empty() {
            self.last_report = report;
            return None;
        }

        let mut search = Search::new(&self.evaluator, budget, state.active_player());
        let best_move = match self.strategy {
            Strategy::Minimax { depth } => match search.minimax(state, depth) {
                Ok(decision) => {
                    report.depth_reached = depth;
                    report.score = Some(decision.score);
                    decision.best_move
                }
                Err(SearchTimeout) => {
                    debug!("{}: minimax to depth {} timed out", self.name, depth);
                    report.timed_out = true;
                    None
                }
            },
            Strategy::AlphaBeta { max_depth, opening_book } => {
                match opening_book.then(|| opening_move(state, &legal_moves)).flatten() {
                    Some(center) => {
                        trace!("{}: opening book move {}", self.name, center);
                        report.opening_book = true;
                        Some(center)
                    }
                    None => {
                        let outcome = search.iterative_deepening(state, max_depth);
                        report.depth_reached = outcome.depth_reached;
                        report.timed_out = outcome.timed_out;
                        report.score = outcome.decision.map(|d| d.score);
                        outcome.decision.and_then(|d| d.best_move)
                    }
                }
            }
        };
        report.nodes = search.nodes();
        self.last_report = report;
        best_move
    }
}

/// Center cell on either player's first move, if it is still open.
fn opening_move<G: GameState>(state: &G, legal_moves: &[Move]) -> Option<Move> {
    if state.move_count() > 1 {
        return None;
    }
    let center = state.center();
    legal_moves.contains(&center).then_some(center)
}
