use std::fmt;

use bitvec::prelude::*;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Error, Result};
use crate::game::{GameState, Move, Player};

pub const DEFAULT_SIZE: usize = 7;

// knight jumps, in the order legal moves are enumerated
const DIRECTIONS: [(isize, isize); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

// one bit per cell, row-major: idx = row * width + col; set = blocked
pub type Cells = BitVec<u8, Lsb0>;

/// Isolation board: each player owns one piece that jumps like a chess knight,
/// and every cell a piece lands on is blocked for the rest of the game. The player
/// to move with no open jump loses. Before its first move a piece may be placed
/// on any open cell.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    blocked: Cells,
    locations: [Option<Move>; 2],
    move_count: usize,
    active: Player,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self::empty(width, height))
    }

    fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocked: bitvec![u8, Lsb0; 0; width * height],
            locations: [None, None],
            move_count: 0,
            active: Player::One,
        }
    }

    /// Builds an arbitrary mid-game position. Player locations are blocked
    /// implicitly.
    pub fn from_position(
        width: usize,
        height: usize,
        blocked: &[Move],
        locations: [Option<Move>; 2],
        active: Player,
        move_count: usize,
    ) -> Result<Self> {
        let mut board = Self::new(width, height)?;
        for &cell in blocked.iter().chain(locations.iter().flatten()) {
            if !board.in_bounds(cell) {
                return Err(Error::InvalidConfig(format!("cell {} outside {}x{} board", cell, width, height)));
            }
            board.set_blocked(cell);
        }
        board.locations = locations;
        board.active = active;
        board.move_count = move_count;
        Ok(board)
    }

    fn index(&self, cell: Move) -> usize {
        cell.row * self.width + cell.col
    }

    fn cell(&self, idx: usize) -> Move {
        Move::new(idx / self.width, idx % self.width)
    }

    fn in_bounds(&self, cell: Move) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    fn set_blocked(&mut self, cell: Move) {
        let idx = self.index(cell);
        self.blocked.set(idx, true);
    }

    pub fn is_open(&self, cell: Move) -> bool {
        self.in_bounds(cell) && !self.blocked[self.index(cell)]
    }

    pub fn location(&self, player: Player) -> Option<Move> {
        self.locations[slot(player)]
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Move> + '_ {
        self.blocked.iter_zeros().map(move |idx| self.cell(idx))
    }

    fn jumps_from(&self, from: Move) -> impl Iterator<Item = Move> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let row = from.row.checked_add_signed(dr)?;
            let col = from.col.checked_add_signed(dc)?;
            let to = Move::new(row, col);
            self.is_open(to).then_some(to)
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty()
    }

    pub fn winner(&self) -> Option<Player> {
        self.is_game_over().then(|| self.active.opponent())
    }

    /// Checked counterpart of [`GameState::forecast_move`].
    pub fn make_move(&self, mv: Move) -> Result<Self> {
        if !self.legal_moves().contains(&mv) {
            return Err(Error::IllegalMove { mv, player: self.active });
        }
        Ok(self.forecast_move(mv))
    }
}

fn slot(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

impl GameState for Board {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves_for(&self, player: Player) -> Vec<Move> {
        match self.location(player) {
            Some(from) => self.jumps_from(from).collect(),
            None => self.open_cells().collect(),
        }
    }

    fn forecast_move(&self, mv: Move) -> Self {
        let mut board = self.clone();
        board.set_blocked(mv);
        board.locations[slot(self.active)] = Some(mv);
        board.move_count += 1;
        board.active = self.active.opponent();
        board
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn move_count(&self) -> usize {
        self.move_count
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        let blocked: Vec<Move> = self.blocked.iter_ones().map(|idx| self.cell(idx)).collect();
        let mut s = serializer.serialize_struct("Board", 6)?;
        s.serialize_field("width", &self.width)?;
        s.serialize_field("height", &self.height)?;
        s.serialize_field("blocked", &blocked)?;
        s.serialize_field("locations", &self.locations)?;
        s.serialize_field("move_count", &self.move_count)?;
        s.serialize_field("active", &self.active)?;
        s.end()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Move::new(row, col);
                let c = if self.location(Player::One) == Some(cell) {
                    '1'
                } else if self.location(Player::Two) == Some(cell) {
                    '2'
                } else if self.is_open(cell) {
                    '.'
                } else {
                    '#'
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
