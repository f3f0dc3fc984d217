use std::fmt;
use serde::{Deserialize, Serialize};

/// Heuristic and minimax value. `f64::INFINITY` / `f64::NEG_INFINITY` mark decided games.
pub type Score = f64;

pub const WIN: Score = f64::INFINITY;
pub const LOSS: Score = f64::NEG_INFINITY;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => f.write_str("player one"),
            Player::Two => f.write_str("player two"),
        }
    }
}

/// A board cell, addressed as (row, col). "No legal move" is `Option::<Move>::None`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What the search needs from a game position.
///
/// Implementations are immutable values: `forecast_move` must return a fresh state
/// that shares no mutable data with `self`. Legal-move enumeration order must be
/// deterministic, since it decides both pruning and tie-breaks.
pub trait GameState: Sized {
    fn active_player(&self) -> Player;

    fn legal_moves_for(&self, player: Player) -> Vec<Move>;

    fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_for(self.active_player())
    }

    fn forecast_move(&self, mv: Move) -> Self;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Plies played since the start of the game.
    fn move_count(&self) -> usize;

    /// `player` is to move and has nowhere to go.
    fn is_loser(&self, player: Player) -> bool {
        player == self.active_player() && self.legal_moves_for(player).is_empty()
    }

    /// `player`'s opponent is to move and has nowhere to go.
    fn is_winner(&self, player: Player) -> bool {
        self.is_loser(player.opponent())
    }

    /// Cell at the board center, (height / 2, width / 2).
    fn center(&self) -> Move {
        Move::new(self.height() / 2, self.width() / 2)
    }
}
