//! Time-bounded game-tree search for Isolation.
//!
//! An [`Agent`] binds an [`Evaluator`] and a search [`Strategy`] (fixed-depth
//! minimax, or iterative-deepening alpha-beta) and picks a move for any
//! [`GameState`] before the turn clock runs out.

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod search;

pub use agent::{Agent, SearchReport, Strategy};
pub use board::Board;
pub use config::{AgentConfig, MatchConfig, TimeoutConfig};
pub use error::{Error, Result};
pub use game::{GameState, Move, Player, Score, LOSS, WIN};
pub use heuristics::{Evaluator, Heuristic};
pub use search::{countdown, Search, SearchBudget, SearchTimeout};
