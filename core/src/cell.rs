use serde::{Deserialize, Serialize};

/// Player-visible state of one grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Revealed(u8),
    Flagged,
    /// The mine that ended the game.
    Exploded,
    /// Any other mine, shown once the game is lost.
    Mine,
    /// A flagged cell that held no mine, shown once the game is lost.
    FalseFlag,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// Whether the cell still renders as an untouched cover.
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
