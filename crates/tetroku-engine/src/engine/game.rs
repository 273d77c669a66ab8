use std::time::Duration;

use crate::PlacementError;

use super::{
    game_session::{GameSession, PlacementOutcome, PlacementPreview, TurnOutcome},
    presenter::{ClearAnimation, Presenter},
};

/// Turn controller that keeps a [`Presenter`] in sync with a [`GameSession`].
///
/// The controller walks each placement through the same sequence: commit
/// the piece, request the clear animation, resolve the clear, refresh the
/// score and round, and raise the game-over modal when needed.
///
/// # Example
///
/// ```
/// use tetroku_engine::{Game, GameConfig, GameSession, NullPresenter, PieceSeed};
///
/// let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(1)).unwrap();
/// let mut game = Game::new(session, NullPresenter);
///
/// let piece = game.session().hand()[0];
/// let (x, y) = game.session().board().legal_origins(piece.shape()).next().unwrap();
/// assert!(game.preview(x, y, 0).unwrap().is_valid);
///
/// // `NullPresenter` finishes clear animations at once, so every turn settles.
/// let outcome = game.place_piece(x, y, 0).unwrap();
/// assert!(outcome.is_some());
/// ```
#[derive(Debug)]
pub struct Game<P> {
    session: GameSession,
    presenter: P,
}

impl<P> Game<P>
where
    P: Presenter,
{
    /// Wraps `session` and pushes its full state to `presenter`.
    pub fn new(session: GameSession, presenter: P) -> Self {
        let mut this = Self { session, presenter };
        this.sync_all();
        this
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Places a hand piece.
    ///
    /// Returns `Ok(None)` when the presenter reported
    /// [`ClearAnimation::Pending`]; the turn finishes on
    /// [`Self::complete_clear`].
    pub fn place_piece(
        &mut self,
        x: i32,
        y: i32,
        hand_index: usize,
    ) -> Result<Option<TurnOutcome>, PlacementError> {
        let outcome = self.session.place_piece(x, y, hand_index)?;
        self.presenter.clear_preview();
        match outcome {
            PlacementOutcome::Settled(outcome) => {
                self.finish_turn(&outcome);
                Ok(Some(outcome))
            }
            PlacementOutcome::ClearPending(lines) => {
                self.presenter
                    .update_grid(self.session.board(), self.session.clock());
                self.presenter.update_hand(self.session.hand());
                match self.presenter.animate_clear(&lines) {
                    ClearAnimation::Done => self.complete_clear().map(Some),
                    ClearAnimation::Pending => Ok(None),
                }
            }
        }
    }

    /// Resolves the clear whose animation was left pending.
    pub fn complete_clear(&mut self) -> Result<TurnOutcome, PlacementError> {
        let outcome = self.session.complete_clear()?;
        self.finish_turn(&outcome);
        Ok(outcome)
    }

    /// Shows where a hand piece would land; clears the overlay when there is
    /// nothing to preview.
    pub fn preview(&mut self, x: i32, y: i32, hand_index: usize) -> Option<PlacementPreview> {
        match self.session.preview_placement(x, y, hand_index) {
            Some(preview) => {
                self.presenter.show_preview(&preview);
                Some(preview)
            }
            None => {
                self.presenter.clear_preview();
                None
            }
        }
    }

    pub fn clear_preview(&mut self) {
        self.presenter.clear_preview();
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.presenter.hide_game_over();
        self.presenter.clear_preview();
        self.sync_all();
    }

    /// Advances the game clock by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.session.phase().is_game_over() {
            return;
        }
        self.session.tick(dt);
        self.presenter.update_time(self.session.elapsed());
    }

    fn finish_turn(&mut self, outcome: &TurnOutcome) {
        self.presenter
            .update_grid(self.session.board(), self.session.clock());
        self.presenter.update_hand(self.session.hand());
        self.presenter.update_score(self.session.score());
        self.presenter.update_round(self.session.stats().round_count());
        if outcome.game_over {
            self.presenter
                .show_game_over(self.session.score(), self.session.elapsed());
        }
    }

    fn sync_all(&mut self) {
        let session = &self.session;
        self.presenter.redraw(session);
        self.presenter.update_grid(session.board(), session.clock());
        self.presenter.update_hand(session.hand());
        self.presenter.update_score(session.score());
        self.presenter.update_round(session.stats().round_count());
        self.presenter.update_time(session.elapsed());
        if session.phase().is_game_over() {
            self.presenter.show_game_over(session.score(), session.elapsed());
        }
    }
}
