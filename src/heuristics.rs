//! Leaf evaluators.
//!
//! Every evaluator scores a position from the point of view of one player and
//! must return [`LOSS`] when that player has lost and [`WIN`] when its opponent has.
//! Everything else is a finite, board-geometry or move-counting estimate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::game::{GameState, Move, Player, Score, LOSS, WIN};

pub trait Evaluator<G: GameState> {
    fn evaluate(&self, state: &G, player: Player) -> Score;
}

fn decided<G: GameState>(state: &G, player: Player) -> Option<Score> {
    if state.is_loser(player) {
        Some(LOSS)
    } else if state.is_winner(player) {
        Some(WIN)
    } else {
        None
    }
}

/// Squared count of our moves whose point reflection through the center is not
/// open to the opponent, minus the opponent's move count.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AsymmetricMobility;

impl AsymmetricMobility {
    fn reflect<G: GameState>(state: &G, mv: Move) -> Option<Move> {
        let row = state.height().checked_sub(1)?.checked_sub(mv.row)?;
        let col = state.width().checked_sub(1)?.checked_sub(mv.col)?;
        Some(Move::new(row, col))
    }
}

impl<G: GameState> Evaluator<G> for AsymmetricMobility {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        if let Some(score) = decided(state, player) {
            return score;
        }
        let own_moves = state.legal_moves_for(player);
        let opp_moves: HashSet<Move> = state.legal_moves_for(player.opponent()).into_iter().collect();
        let unreflected = own_moves
            .iter()
            .filter(|&&mv| !Self::reflect(state, mv).is_some_and(|r| opp_moves.contains(&r)))
            .count() as Score;
        unreflected * unreflected - opp_moves.len() as Score
    }
}

/// Sum over our moves of `1 / max(eps, center_row - row) + 1 / max(eps, center_col - col)`.
///
/// The distance is signed, so a move on or past the center row (column) earns the
/// full `1 / eps` for that axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterAffinity {
    pub epsilon: f64,
}

impl Default for CenterAffinity {
    fn default() -> Self {
        Self { epsilon: 0.01 }
    }
}

impl<G: GameState> Evaluator<G> for CenterAffinity {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        if let Some(score) = decided(state, player) {
            return score;
        }
        let center = state.center();
        state
            .legal_moves_for(player)
            .into_iter()
            .map(|mv| {
                let row_distance = (center.row as f64 - mv.row as f64).max(self.epsilon);
                let col_distance = (center.col as f64 - mv.col as f64).max(self.epsilon);
                1.0 / row_distance + 1.0 / col_distance
            })
            .sum()
    }
}

/// `weight / max(eps, opponent move count)`: prefers positions that starve the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentRestriction {
    pub weight: f64,
    pub epsilon: f64,
}

impl Default for OpponentRestriction {
    fn default() -> Self {
        Self { weight: 100.0, epsilon: 0.0001 }
    }
}

impl<G: GameState> Evaluator<G> for OpponentRestriction {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        if let Some(score) = decided(state, player) {
            return score;
        }
        let opp_moves = state.legal_moves_for(player.opponent()).len() as f64;
        self.weight / opp_moves.max(self.epsilon)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MobilityDifference;

impl<G: GameState> Evaluator<G> for MobilityDifference {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        if let Some(score) = decided(state, player) {
            return score;
        }
        let own = state.legal_moves_for(player).len() as Score;
        let opp = state.legal_moves_for(player.opponent()).len() as Score;
        own - opp
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OpenMoves;

impl<G: GameState> Evaluator<G> for OpenMoves {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        if let Some(score) = decided(state, player) {
            return score;
        }
        state.legal_moves_for(player).len() as Score
    }
}

/// Evaluator picked by name from configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Heuristic {
    #[default]
    AsymmetricMobility,
    CenterAffinity(CenterAffinity),
    OpponentRestriction(OpponentRestriction),
    MobilityDifference,
    OpenMoves,
}

impl<G: GameState> Evaluator<G> for Heuristic {
    fn evaluate(&self, state: &G, player: Player) -> Score {
        match self {
            Heuristic::AsymmetricMobility => AsymmetricMobility.evaluate(state, player),
            Heuristic::CenterAffinity(h) => h.evaluate(state, player),
            Heuristic::OpponentRestriction(h) => h.evaluate(state, player),
            Heuristic::MobilityDifference => MobilityDifference.evaluate(state, player),
            Heuristic::OpenMoves => OpenMoves.evaluate(state, player),
        }
    }
}
