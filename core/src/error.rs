use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates outside the grid")]
    OutOfBounds,
    #[error("mine count leaves no room for the first-click safe zone")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;
