use alloc::collections::VecDeque;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions: Playing -> Won and Playing -> Lost. Terminal states
/// accept no further moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of a reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Merges per-cell outcomes when chording: a hit dominates, then a win.
    const fn merge(self, other: Self) -> Self {
        use RevealOutcome::*;
        match (self, other) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// The minefield engine: sole owner and mutator of the grid state.
#[derive(Clone, Debug)]
pub struct Minefield<P: MinePlacer = ShufflePlacer> {
    config: GameConfig,
    placer: P,
    /// Placed on the first reveal so the safe zone can honor that click.
    layout: Option<MineLayout>,
    board: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: GameState,
    triggered_mine: Option<Pos>,
}

impl Minefield<ShufflePlacer> {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_placer(config, ShufflePlacer::new(seed))
    }

    /// Engine over a pre-built layout. The placement phase is already done,
    /// so the placer is inert.
    pub fn from_layout(layout: MineLayout) -> Self {
        let mut field = Self::with_placer(layout.game_config(), ShufflePlacer::new(0));
        field.layout = Some(layout);
        field
    }
}

impl<P: MinePlacer> Minefield<P> {
    pub fn with_placer(config: GameConfig, placer: P) -> Self {
        Self {
            config,
            placer,
            layout: None,
            board: Array2::default(nd(config.size)),
            revealed_count: 0,
            flagged_count: 0,
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Pos {
        self.config.size
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whether the first reveal has happened.
    pub fn started(&self) -> bool {
        self.revealed_count > 0 || self.state.is_terminal()
    }

    /// Whether the deferred placement phase has run.
    pub fn mines_placed(&self) -> bool {
        self.layout.is_some()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Mines not yet flagged; negative when the player overflags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flagged_count)
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.revealed_count
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.board[nd(pos)]
    }

    pub fn has_mine(&self, pos: Pos) -> bool {
        self.layout
            .as_ref()
            .is_some_and(|layout| layout.has_mine(pos))
    }

    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    /// Reveal a cell. The first reveal of a game also places the mines,
    /// keeping the zone around that click clear, so it can never lose.
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.validate(pos)?;
        if self.state.is_terminal() || !matches!(self.board[nd(pos)], Cell::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }
        if self.layout.is_none() {
            self.layout = Some(self.placer.place(self.config, pos));
        }
        Ok(self.open_cell(pos))
    }

    /// Flip the flag on a covered cell. Flags block reveals until removed.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let pos = self.validate(pos)?;
        if self.state.is_terminal() {
            return Ok(FlagOutcome::NoChange);
        }
        Ok(match self.board[nd(pos)] {
            Cell::Hidden => {
                self.board[nd(pos)] = Cell::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Changed
            }
            Cell::Flagged => {
                self.board[nd(pos)] = Cell::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Changed
            }
            _ => FlagOutcome::NoChange,
        })
    }

    /// Open every unflagged neighbor of a revealed cell whose number is
    /// fully accounted for by adjacent flags.
    pub fn chord_reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.validate(pos)?;
        if self.state.is_terminal() {
            return Ok(RevealOutcome::NoChange);
        }
        let Cell::Revealed(count) = self.board[nd(pos)] else {
            return Ok(RevealOutcome::NoChange);
        };
        if count == 0 || count != self.flagged_neighbors(pos) {
            return Ok(RevealOutcome::NoChange);
        }
        let mut outcome = RevealOutcome::NoChange;
        for neighbor in neighbors(pos, self.config.size) {
            outcome = outcome.merge(self.open_cell(neighbor));
        }
        Ok(outcome)
    }

    fn validate(&self, pos: Pos) -> Result<Pos> {
        let (rows, cols) = self.config.size;
        if pos.0 < rows && pos.1 < cols {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    fn flagged_neighbors(&self, pos: Pos) -> u8 {
        neighbors(pos, self.config.size)
            .filter(|&p| self.board[nd(p)] == Cell::Flagged)
            .count() as u8
    }

    /// Open one hidden cell and flood outward through the zero-count region.
    fn open_cell(&mut self, pos: Pos) -> RevealOutcome {
        if self.state.is_terminal() || !matches!(self.board[nd(pos)], Cell::Hidden) {
            return RevealOutcome::NoChange;
        }
        let Some(layout) = self.layout.as_ref() else {
            return RevealOutcome::NoChange;
        };

        if layout.has_mine(pos) {
            log::debug!("mine hit at {:?}", pos);
            self.board[nd(pos)] = Cell::Exploded;
            self.triggered_mine = Some(pos);
            self.finish(false);
            return RevealOutcome::HitMine;
        }

        let size = self.config.size;
        let count = layout.adjacent_mines(pos);
        self.board[nd(pos)] = Cell::Revealed(count);
        self.revealed_count += 1;
        log::trace!("revealed {:?}, adjacent mines: {}", pos, count);

        if count == 0 {
            let mut visited: HashSet<Pos> = HashSet::new();
            visited.insert(pos);
            let mut frontier: VecDeque<Pos> = neighbors(pos, size)
                .filter(|&p| matches!(self.board[nd(p)], Cell::Hidden))
                .collect();

            while let Some(next) = frontier.pop_front() {
                if !visited.insert(next) {
                    continue;
                }
                // flags and anything already open stay untouched
                if !matches!(self.board[nd(next)], Cell::Hidden) {
                    continue;
                }
                let next_count = layout.adjacent_mines(next);
                self.board[nd(next)] = Cell::Revealed(next_count);
                self.revealed_count += 1;
                if next_count == 0 {
                    frontier.extend(
                        neighbors(next, size)
                            .filter(|&p| matches!(self.board[nd(p)], Cell::Hidden))
                            .filter(|p| !visited.contains(p)),
                    );
                }
            }
        }

        if self.revealed_count == layout.safe_cell_count() {
            self.finish(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Terminal transition. The board mutations here are part of entering
    /// the terminal state; nothing mutates after it.
    fn finish(&mut self, won: bool) {
        if self.state.is_terminal() {
            return;
        }
        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!("game over, won: {}", won);
        self.expose_mines(won);
    }

    /// Show the full minefield on a loss; flag the remaining mines on a win.
    fn expose_mines(&mut self, won: bool) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let pos = (row, col);
                match (self.board[nd(pos)], layout.has_mine(pos)) {
                    (Cell::Hidden, true) if won => {
                        self.board[nd(pos)] = Cell::Flagged;
                        self.flagged_count += 1;
                    }
                    (Cell::Hidden, true) => self.board[nd(pos)] = Cell::Mine,
                    (Cell::Flagged, false) => self.board[nd(pos)] = Cell::FalseFlag,
                    _ => {}
                }
            }
        }
    }
}
