use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration, need a non-empty board and 0 < mines < width * height")]
    InvalidConfiguration,
    #[error("Coordinates are out of bounds")]
    OutOfBounds,
    #[error("Cell is already revealed or flagged")]
    AlreadyRevealed,
    #[error("Game already over, no new moves are accepted")]
    GameAlreadyOver,
}

pub type Result<T> = core::result::Result<T, GameError>;
