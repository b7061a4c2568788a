use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine truth and player visibility for every cell of one game.
///
/// Truth is written while the mines are laid out and never changes afterwards, only the engine touches
/// the visibility grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    truth: Array2<Truth>,
    visibility: Array2<Visibility>,
    revealed_safe_count: CellCount,
}

impl Board {
    /// Empty board, mine placement fills it in through [`Board::lay_mine`] and [`Board::finish_layout`].
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            config,
            truth: Array2::default(grid_shape(config.size)),
            visibility: Array2::default(grid_shape(config.size)),
            revealed_safe_count: 0,
        }
    }

    /// Board with mines at exactly the given coordinates, duplicates are ignored.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration);
        }

        let mut mines = BTreeSet::new();
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines.insert(coords);
        }

        let count = CellCount::try_from(mines.len()).map_err(|_| GameError::InvalidConfiguration)?;
        let mut board = Self::new(GameConfig::new(size, count)?);
        for coords in mines {
            board.lay_mine(coords);
        }
        board.finish_layout();
        Ok(board)
    }

    /// Marks a mine, returns `false` when the cell already had one.
    pub(crate) fn lay_mine(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.truth[coords.to_nd_index()];
        if cell.is_mine() {
            return false;
        }
        *cell = Truth::Mine;
        true
    }

    pub(crate) fn finish_layout(&mut self) {
        fill_counts(&mut self.truth);
        debug_assert_eq!(
            self.truth.iter().filter(|truth| truth.is_mine()).count(),
            usize::from(self.config.mines)
        );
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn width(&self) -> Coord {
        self.config.width()
    }

    pub fn height(&self) -> Coord {
        self.config.height()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_safe_count == self.safe_cell_count()
    }

    pub fn truth_at(&self, coords: Coord2) -> Result<Truth> {
        let coords = self.validate_coords(coords)?;
        Ok(self.truth[coords.to_nd_index()])
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        Ok(self.truth_at(coords)?.is_mine())
    }

    /// Mines around a safe cell, `None` for a mine.
    pub fn adjacent_count(&self, coords: Coord2) -> Result<Option<u8>> {
        Ok(match self.truth_at(coords)? {
            Truth::Mine => None,
            Truth::SafeCount(count) => Some(count),
        })
    }

    pub fn visibility_at(&self, coords: Coord2) -> Result<Visibility> {
        let coords = self.validate_coords(coords)?;
        Ok(self.visibility[coords.to_nd_index()])
    }

    /// Revealed cells stay revealed. Revealing a safe cell bumps the revealed count.
    pub(crate) fn set_visibility(&mut self, coords: Coord2, state: Visibility) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let index = coords.to_nd_index();

        if self.visibility[index] == Visibility::Revealed {
            return Err(GameError::AlreadyRevealed);
        }

        if state == Visibility::Revealed && !self.truth[index].is_mine() {
            self.revealed_safe_count += 1;
        }
        self.visibility[index] = state;
        Ok(())
    }

    /// All coordinates, row by row.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords()
            .filter(|&coords| self.truth[coords.to_nd_index()].is_mine())
    }
}
