use alloc::boxed::Box;

use crate::*;

/// Reported score value.
pub type Score = u32;

/// Callbacks the session's owner receives as a game progresses. Methods
/// default to no-ops so implementors pick the ones they care about.
pub trait GameObserver {
    /// Score 0 on every (re)initialization, the final score once the game
    /// ends.
    fn score_reported(&mut self, _score: Score) {}

    /// Fired once per game when it reaches Won or Lost.
    fn game_over(&mut self, _state: GameState) {}
}

/// Observer used when the caller does not install one.
struct SilentObserver;

impl GameObserver for SilentObserver {}

/// Score for a won game after `elapsed_secs`: the difficulty's base score
/// minus 10 points per full 10 seconds, never below zero.
pub fn final_score(difficulty: Difficulty, elapsed_secs: u32) -> Score {
    difficulty.base_score().saturating_sub(elapsed_secs / 10 * 10)
}

/// A playable game from difficulty selection to the final score report.
pub struct GameSession {
    difficulty: Difficulty,
    field: Minefield,
    elapsed_secs: u32,
    final_score: Option<Score>,
    observer: Box<dyn GameObserver>,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_observer(difficulty, seed, Box::new(SilentObserver))
    }

    pub fn with_observer(
        difficulty: Difficulty,
        seed: u64,
        observer: Box<dyn GameObserver>,
    ) -> Self {
        let mut session = Self {
            difficulty,
            field: Minefield::new(difficulty.config(), seed),
            elapsed_secs: 0,
            final_score: None,
            observer,
        };
        session.observer.score_reported(0);
        session
    }

    /// Fresh game at the current difficulty.
    pub fn restart(&mut self, seed: u64) {
        self.field = Minefield::new(self.difficulty.config(), seed);
        self.elapsed_secs = 0;
        self.final_score = None;
        self.observer.score_reported(0);
    }

    /// Fresh game at a new difficulty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty, seed: u64) {
        self.difficulty = difficulty;
        self.restart(seed);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> GameState {
        self.field.state()
    }

    pub fn size(&self) -> Pos {
        self.field.size()
    }

    pub fn started(&self) -> bool {
        self.field.started()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn flags_placed(&self) -> CellCount {
        self.field.flags_placed()
    }

    pub fn mines_left(&self) -> i32 {
        self.field.mines_left()
    }

    pub fn total_mines(&self) -> CellCount {
        self.field.total_mines()
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.field.cell_at(pos)
    }

    pub fn has_mine(&self, pos: Pos) -> bool {
        self.field.has_mine(pos)
    }

    /// The score reported when the game ended, if it has.
    pub fn final_score(&self) -> Option<Score> {
        self.final_score
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let outcome = self.field.reveal(pos)?;
        self.settle(outcome);
        Ok(outcome)
    }

    pub fn chord_reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let outcome = self.field.chord_reveal(pos)?;
        self.settle(outcome);
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        self.field.toggle_flag(pos)
    }

    /// One second of play time. Ticks are ignored until the first reveal
    /// and after the game ends, so idle thinking time stays free.
    pub fn tick(&mut self) {
        if self.field.started() && self.field.state() == GameState::Playing {
            self.elapsed_secs += 1;
        }
    }

    fn settle(&mut self, outcome: RevealOutcome) {
        let score = match outcome {
            RevealOutcome::Won => final_score(self.difficulty, self.elapsed_secs),
            RevealOutcome::HitMine => 0,
            RevealOutcome::Revealed | RevealOutcome::NoChange => return,
        };
        self.final_score = Some(score);
        log::debug!("final score: {}", score);
        self.observer.score_reported(score);
        self.observer.game_over(self.field.state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Clone, Default)]
    struct Recorder {
        scores: Rc<RefCell<Vec<Score>>>,
        endings: Rc<RefCell<Vec<GameState>>>,
    }

    impl GameObserver for Recorder {
        fn score_reported(&mut self, score: Score) {
            self.scores.borrow_mut().push(score);
        }

        fn game_over(&mut self, state: GameState) {
            self.endings.borrow_mut().push(state);
        }
    }

    impl GameSession {
        /// Session over a hand-built layout, skipping random placement.
        fn over_layout(
            difficulty: Difficulty,
            layout: MineLayout,
            observer: Box<dyn GameObserver>,
        ) -> Self {
            let mut session = Self {
                difficulty,
                field: Minefield::from_layout(layout),
                elapsed_secs: 0,
                final_score: None,
                observer,
            };
            session.observer.score_reported(0);
            session
        }
    }

    fn one_mine_corner() -> MineLayout {
        MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap()
    }

    fn positions(size: Pos) -> impl Iterator<Item = Pos> {
        (0..size.0).flat_map(move |row| (0..size.1).map(move |col| (row, col)))
    }

    #[test]
    fn timer_waits_for_the_first_reveal_and_freezes_at_the_end() {
        let mut session =
            GameSession::over_layout(Difficulty::Easy, one_mine_corner(), Box::new(SilentObserver));
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_secs(), 0);

        session.reveal((0, 1)).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);

        session.reveal((1, 0)).unwrap();
        session.reveal((1, 1)).unwrap();
        assert_eq!(session.state(), GameState::Won);
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn a_timed_win_reports_the_penalized_score() {
        let recorder = Recorder::default();
        let mut session = GameSession::over_layout(
            Difficulty::Easy,
            one_mine_corner(),
            Box::new(recorder.clone()),
        );
        session.reveal((0, 1)).unwrap();
        for _ in 0..25 {
            session.tick();
        }
        session.reveal((1, 0)).unwrap();
        session.reveal((1, 1)).unwrap();

        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.final_score(), Some(980));
        assert_eq!(recorder.scores.borrow().as_slice(), &[0, 980]);
        assert_eq!(recorder.endings.borrow().as_slice(), &[GameState::Won]);
    }

    #[test]
    fn a_loss_reports_zero() {
        let recorder = Recorder::default();
        let mut session = GameSession::over_layout(
            Difficulty::Easy,
            one_mine_corner(),
            Box::new(recorder.clone()),
        );
        session.reveal((0, 1)).unwrap();
        for _ in 0..40 {
            session.tick();
        }
        session.reveal((0, 0)).unwrap();

        assert_eq!(session.state(), GameState::Lost);
        assert_eq!(session.final_score(), Some(0));
        assert_eq!(recorder.scores.borrow().as_slice(), &[0, 0]);
        assert_eq!(recorder.endings.borrow().as_slice(), &[GameState::Lost]);
    }

    #[test]
    fn score_drops_ten_points_per_ten_seconds_and_clamps() {
        assert_eq!(final_score(Difficulty::Easy, 0), 1000);
        assert_eq!(final_score(Difficulty::Easy, 9), 1000);
        assert_eq!(final_score(Difficulty::Easy, 10), 990);
        assert_eq!(final_score(Difficulty::Easy, 25), 980);
        assert_eq!(final_score(Difficulty::Medium, 101), 1900);
        assert_eq!(final_score(Difficulty::Hard, 5), 3000);
        assert_eq!(final_score(Difficulty::Easy, 1_000_000), 0);

        for (quicker, slower) in [(0, 30), (40, 90), (500, 20_000)] {
            assert!(
                final_score(Difficulty::Easy, quicker) >= final_score(Difficulty::Easy, slower)
            );
        }
    }

    #[test]
    fn restart_and_difficulty_change_reset_the_game() {
        let recorder = Recorder::default();
        let mut session = GameSession::over_layout(
            Difficulty::Easy,
            one_mine_corner(),
            Box::new(recorder.clone()),
        );
        session.reveal((0, 1)).unwrap();
        session.tick();

        session.restart(4);
        assert_eq!(session.state(), GameState::Playing);
        assert!(!session.started());
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.final_score(), None);
        assert_eq!(session.size(), (9, 9));
        assert!(positions(session.size()).all(|pos| session.cell_at(pos) == Cell::Hidden));

        session.set_difficulty(Difficulty::Medium, 4);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(session.size(), (16, 16));
        assert_eq!(session.total_mines(), 40);
        assert_eq!(recorder.scores.borrow().as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn deferred_placement_keeps_the_first_session_reveal_safe() {
        let mut session = GameSession::new(Difficulty::Medium, 17);
        session.reveal((8, 8)).unwrap();
        assert_ne!(session.state(), GameState::Lost);
        assert!(!session.has_mine((8, 8)));
        for pos in neighbors((8, 8), session.size()) {
            assert!(!session.has_mine(pos));
        }
    }
}
