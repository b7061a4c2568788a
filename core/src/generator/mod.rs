use crate::*;
pub use random::*;

mod random;

/// Lays the mines of a fresh board.
pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}
