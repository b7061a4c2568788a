use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, keep it if it isn't a mine yet, repeat
/// until every mine is placed.
///
/// Draws degrade as the board fills up, which is fine at the densities the game is played at.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    /// Reproducible layout for the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed drawn from the thread-local, OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        // sampling would never finish on a full board
        config.validate()?;
        log::debug!("placing {} mines on {:?} with seed {}", config.mines, config.size, self.seed);

        let (width, height) = config.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut board = Board::new(config);
        let mut remaining = config.mines;
        let mut draws: u32 = 0;

        while remaining > 0 {
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            draws += 1;
            if board.lay_mine(coords) {
                remaining -= 1;
            } else {
                log::trace!("rejected draw at {:?}", coords);
            }
        }
        log::trace!("placed {} mines in {} draws", config.mines, draws);

        board.finish_layout();
        Ok(board)
    }
}
