#![no_std]

extern crate alloc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use placer::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod placer;
mod session;
mod types;

/// Cells reserved around the first reveal so placement can always succeed.
const SAFE_ZONE_CELLS: CellCount = 9;

/// Preset tiers exposed to the difficulty selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((9, 9), 10),
            Self::Medium => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((16, 30), 99),
        }
    }

    /// Score awarded for an instant win, before the time penalty.
    pub const fn base_score(self) -> Score {
        match self {
            Self::Easy => 1000,
            Self::Medium => 2000,
            Self::Hard => 3000,
        }
    }
}

/// Board shape and mine count behind a difficulty preset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Pos,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Pos, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validated constructor for custom boards: the mine count must leave
    /// room for the largest possible first-click safe zone.
    pub fn new(size: Pos, mines: CellCount) -> Result<Self> {
        let size = (size.0.max(1), size.1.max(1));
        let mines = mines.max(1);
        if mines.saturating_add(SAFE_ZONE_CELLS) > cell_product(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_product(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Finalized mine placement together with its adjacency counts.
///
/// The counts are fixed once, here, when the layout is built; nothing
/// recomputes them afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    adjacent: Array2<u8>,
    count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let dim = mines.dim();
        let size: Pos = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        let count = mines
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let mut adjacent: Array2<u8> = Array2::zeros(dim);
        for row in 0..size.0 {
            for col in 0..size.1 {
                let pos = (row, col);
                let around = neighbors(pos, size).filter(|&p| mines[nd(p)]).count();
                adjacent[nd(pos)] = around as u8;
            }
        }

        Self {
            mines,
            adjacent,
            count,
        }
    }

    pub fn from_mine_coords(size: Pos, mine_coords: &[Pos]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(nd(size));
        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines[nd(pos)] = true;
        }
        Ok(Self::from_mine_mask(mines))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.count,
        }
    }

    pub fn size(&self) -> Pos {
        let dim = self.mines.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn mine_count(&self) -> CellCount {
        self.count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.count
    }

    pub fn has_mine(&self, pos: Pos) -> bool {
        self.mines[nd(pos)]
    }

    pub fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.adjacent[nd(pos)]
    }
}
