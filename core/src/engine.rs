use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
/// - InProgress -> Abandoned
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    InProgress,
    Won,
    Lost,
    /// Input went away before the game was decided.
    Abandoned,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Reveal,
    ToggleFlag,
}

/// What a move did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Flagged,
    Unflagged,
    /// Safe cell revealed, carries its count.
    Revealed(u8),
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    state: EngineState,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            state: Default::default(),
            flagged_count: 0,
            triggered_mine: None,
        }
    }

    /// Lays out a fresh board with `generator` and starts playing on it.
    pub fn generate(generator: impl MineGenerator, config: GameConfig) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// The cell as the player currently sees it.
    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        Ok(match self.board.visibility_at(coords)? {
            Visibility::Hidden => CellView::Hidden,
            Visibility::Flagged => CellView::Flagged,
            Visibility::Revealed => self.board.truth_at(coords)?.into(),
        })
    }

    /// The cell with nothing hidden, for showing the whole board once the game is over.
    pub fn truth_view(&self, coords: Coord2) -> Result<CellView> {
        Ok(self.board.truth_at(coords)?.into())
    }

    pub fn apply_move(&mut self, coords: Coord2, intent: Intent) -> Result<MoveOutcome> {
        self.check_in_progress()?;
        let coords = self.board.validate_coords(coords)?;

        let outcome = match intent {
            Intent::Reveal => self.reveal_cell(coords),
            Intent::ToggleFlag => self.toggle_cell_flag(coords),
        };
        match outcome {
            Ok(outcome) => log::debug!("{:?} at {:?}: {:?}", intent, coords, outcome),
            Err(err) => log::debug!("{:?} at {:?} rejected: {}", intent, coords, err),
        }
        outcome
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        self.apply_move(coords, Intent::Reveal)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        self.apply_move(coords, Intent::ToggleFlag)
    }

    /// Ends a game whose input is gone, without a verdict.
    pub fn abandon(&mut self) {
        if !self.state.is_finished() {
            log::info!("game abandoned");
            self.state = EngineState::Abandoned;
        }
    }

    fn toggle_cell_flag(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        use Visibility::*;

        match self.board.visibility_at(coords)? {
            Hidden => {
                self.board.set_visibility(coords, Flagged)?;
                self.flagged_count += 1;
                Ok(MoveOutcome::Flagged)
            }
            Flagged => {
                self.board.set_visibility(coords, Hidden)?;
                self.flagged_count -= 1;
                Ok(MoveOutcome::Unflagged)
            }
            Revealed => Err(GameError::AlreadyRevealed),
        }
    }

    /// Reveals exactly one cell, zero counts do not spread to their neighbors.
    fn reveal_cell(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        // a flag protects the cell until it is explicitly removed
        if self.board.visibility_at(coords)? != Visibility::Hidden {
            return Err(GameError::AlreadyRevealed);
        }

        self.board.set_visibility(coords, Visibility::Revealed)?;
        match self.board.truth_at(coords)? {
            Truth::Mine => {
                self.triggered_mine = Some(coords);
                self.end_game(false);
                Ok(MoveOutcome::Lost)
            }
            Truth::SafeCount(count) => {
                if self.board.all_safe_revealed() {
                    self.end_game(true);
                    Ok(MoveOutcome::Won)
                } else {
                    Ok(MoveOutcome::Revealed(count))
                }
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::info!(
            "game {:?} with {}/{} safe cells revealed",
            self.state,
            self.board.revealed_safe_count(),
            self.board.safe_cell_count()
        );
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> PlayEngine {
        PlayEngine::new(Board::from_mine_coords(size, mines).unwrap())
    }

    fn safe_cells(engine: &PlayEngine) -> Vec<Coord2> {
        let board = engine.board();
        board
            .iter_coords()
            .filter(|&coords| !board.is_mine(coords).unwrap())
            .collect()
    }

    #[test]
    fn reveal_shows_count_without_cascade() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((2, 2)), Ok(MoveOutcome::Revealed(0)));
        assert_eq!(engine.cell_view((2, 2)), Ok(CellView::Count(0)));
        assert_eq!(engine.cell_view((1, 1)), Ok(CellView::Hidden));
        assert_eq!(engine.cell_view((2, 1)), Ok(CellView::Hidden));
        assert_eq!(engine.board().revealed_safe_count(), 1);
    }

    #[test]
    fn forced_corner_mine_game_is_won_cell_by_cell() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 1)), Ok(MoveOutcome::Revealed(1)));
        assert_eq!(engine.board().adjacent_count((1, 1)), Ok(Some(1)));

        let rest = [(1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2)];
        for coords in rest {
            assert!(matches!(engine.reveal(coords), Ok(MoveOutcome::Revealed(_))));
            assert_eq!(engine.state(), EngineState::InProgress);
        }
        assert_eq!(engine.reveal((2, 2)), Ok(MoveOutcome::Won));
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.board().revealed_safe_count(), 8);

        assert_eq!(engine.reveal((1, 1)), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn revealing_mine_loses_immediately() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(engine.reveal((0, 0)), Ok(MoveOutcome::Lost));
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Mine));
        assert_eq!(engine.cell_view((2, 2)), Ok(CellView::Hidden));
        assert_eq!(engine.board().revealed_safe_count(), 0);
    }

    #[test]
    fn losing_on_last_move_still_loses() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        engine.reveal((1, 0)).unwrap();
        engine.reveal((0, 1)).unwrap();
        assert_eq!(engine.reveal((0, 0)), Ok(MoveOutcome::Lost));
        assert_eq!(engine.state(), EngineState::Lost);
    }

    #[test]
    fn flag_toggles_back_to_hidden() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.toggle_flag((2, 2)), Ok(MoveOutcome::Flagged));
        assert_eq!(engine.cell_view((2, 2)), Ok(CellView::Flagged));
        assert_eq!(engine.flags_placed(), 1);
        assert_eq!(engine.mines_left(), 0);

        assert_eq!(engine.toggle_flag((2, 2)), Ok(MoveOutcome::Unflagged));
        assert_eq!(engine.board().visibility_at((2, 2)), Ok(Visibility::Hidden));
        assert_eq!(engine.flags_placed(), 0);
        assert_eq!(engine.mines_left(), 1);
    }

    #[test]
    fn flagged_cell_refuses_reveal() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        let before = engine.board().clone();

        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.reveal((0, 0)), Err(GameError::AlreadyRevealed));

        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Flagged));
        assert_eq!(engine.board().is_mine((0, 0)), before.is_mine((0, 0)));
        assert_eq!(engine.board().revealed_safe_count(), 0);
        assert_eq!(engine.state(), EngineState::InProgress);

        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.reveal((1, 1)), Ok(MoveOutcome::Revealed(1)));
    }

    #[test]
    fn flagged_safe_cell_needs_explicit_unflag() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        engine.toggle_flag((2, 2)).unwrap();
        assert_eq!(engine.reveal((2, 2)), Err(GameError::AlreadyRevealed));
        assert_eq!(engine.board().revealed_safe_count(), 0);

        engine.toggle_flag((2, 2)).unwrap();
        assert_eq!(engine.reveal((2, 2)), Ok(MoveOutcome::Revealed(0)));
    }

    #[test]
    fn revealed_cell_rejects_every_intent() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.reveal((1, 1)), Err(GameError::AlreadyRevealed));
        assert_eq!(engine.toggle_flag((1, 1)), Err(GameError::AlreadyRevealed));
        assert_eq!(engine.cell_view((1, 1)), Ok(CellView::Count(1)));
        assert_eq!(engine.board().revealed_safe_count(), 1);
        assert_eq!(engine.flags_placed(), 0);
    }

    #[test]
    fn out_of_bounds_moves_are_recoverable() {
        let mut engine = engine((4, 2), &[(0, 0)]);

        assert_eq!(engine.reveal((4, 0)), Err(GameError::OutOfBounds));
        assert_eq!(engine.toggle_flag((0, 2)), Err(GameError::OutOfBounds));
        assert_eq!(engine.state(), EngineState::InProgress);
        assert_eq!(engine.reveal((3, 1)), Ok(MoveOutcome::Revealed(0)));
    }

    #[test]
    fn revealed_safe_count_grows_by_one_per_safe_reveal() {
        let mut engine = engine((4, 4), &[(0, 0), (3, 3)]);

        let mut expected = 0;
        for coords in safe_cells(&engine) {
            engine.toggle_flag(coords).unwrap();
            engine.toggle_flag(coords).unwrap();
            assert_eq!(engine.board().revealed_safe_count(), expected);

            engine.reveal(coords).unwrap();
            expected += 1;
            assert_eq!(engine.board().revealed_safe_count(), expected);

            if !engine.is_finished() {
                assert_eq!(engine.reveal(coords), Err(GameError::AlreadyRevealed));
                assert_eq!(engine.board().revealed_safe_count(), expected);
            }
        }
        assert_eq!(engine.state(), EngineState::Won);
    }

    #[test]
    fn won_only_after_every_safe_cell() {
        let mut engine = engine((3, 2), &[(1, 0), (2, 1)]);
        let safe = safe_cells(&engine);
        let (last, rest) = safe.split_last().unwrap();

        for &coords in rest {
            engine.reveal(coords).unwrap();
            assert_eq!(engine.state(), EngineState::InProgress);
        }
        assert_eq!(engine.reveal(*last), Ok(MoveOutcome::Won));
        assert_eq!(engine.triggered_mine(), None);
    }

    #[test]
    fn finished_games_reject_moves_without_mutation() {
        let mut won = engine((2, 1), &[(0, 0)]);
        won.reveal((1, 0)).unwrap();

        let mut lost = engine((2, 1), &[(0, 0)]);
        lost.reveal((0, 0)).unwrap();

        let mut abandoned = engine((2, 1), &[(0, 0)]);
        abandoned.abandon();

        for mut engine in [won, lost, abandoned] {
            let snapshot = engine.clone();
            for intent in [Intent::Reveal, Intent::ToggleFlag] {
                for coords in [(0, 0), (1, 0), (5, 5)] {
                    assert_eq!(
                        engine.apply_move(coords, intent),
                        Err(GameError::GameAlreadyOver)
                    );
                }
            }
            assert_eq!(engine, snapshot);
        }
    }

    #[test]
    fn abandon_is_terminal_and_keeps_verdicts() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.abandon();
        assert_eq!(engine.state(), EngineState::Abandoned);
        assert!(engine.is_finished());

        let mut lost = engine_after_loss();
        lost.abandon();
        assert_eq!(lost.state(), EngineState::Lost);
    }

    fn engine_after_loss() -> PlayEngine {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((0, 0)).unwrap();
        engine
    }

    #[test]
    fn truth_view_discloses_everything() {
        let engine = engine((2, 2), &[(1, 1)]);

        assert_eq!(engine.truth_view((1, 1)), Ok(CellView::Mine));
        assert_eq!(engine.truth_view((0, 0)), Ok(CellView::Count(1)));
        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Hidden));
        assert_eq!(engine.truth_view((2, 0)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn generated_engine_starts_in_progress() {
        let engine =
            PlayEngine::generate(RandomMineGenerator::new(3), GameConfig::default()).unwrap();

        assert_eq!(engine.state(), EngineState::InProgress);
        assert_eq!(engine.total_mines(), 9);
        assert_eq!(engine.size(), (9, 9));
    }
}
